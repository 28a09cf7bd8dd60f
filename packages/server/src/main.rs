use std::sync::Arc;

use tracing::{Level, info, warn};

use server::config::{AppConfig, EnrollmentMode};
use server::consumers::consume_onboarding_events;
use server::enrollment::{EnrollmentApi, HttpEnrollmentClient, SimulatedEnrollmentClient};
use server::retry::run_retry_scheduler;
use server::state::AppState;
use server::{database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    seed::seed_retry_policies(&db).await?;
    seed::ensure_indexes(&db).await?;

    let enrollment: Arc<dyn EnrollmentApi> = match config.enrollment.mode {
        EnrollmentMode::Simulated => Arc::new(SimulatedEnrollmentClient),
        EnrollmentMode::Http => Arc::new(HttpEnrollmentClient::new(
            config.enrollment.base_url.clone(),
            config.enrollment.timeout_secs,
        )?),
    };

    let mq = if config.mq.enabled {
        let queue = mq::init_mq(mq::MqConfig {
            url: config.mq.url.clone(),
            pool_size: config.mq.pool_size,
        })
        .await?;
        Some(Arc::new(queue))
    } else {
        warn!("MQ disabled; onboarding requests will be ingested inline");
        None
    };

    if let Some(ref mq) = mq {
        tokio::spawn(consume_onboarding_events(
            db.clone(),
            enrollment.clone(),
            mq.clone(),
            config.mq.onboarding_queue_name.clone(),
            config.retry.default_backoff_minutes,
        ));
    }

    tokio::spawn(run_retry_scheduler(
        db.clone(),
        enrollment.clone(),
        config.retry.clone(),
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        db,
        mq,
        enrollment,
        config: Arc::new(config),
    };

    let app = server::build_router(state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
