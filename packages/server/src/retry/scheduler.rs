use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::{RetryAppConfig, TaskPayload, classify, plan_transition};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::enrollment::EnrollmentApi;
use crate::entity::retry_event;

use super::RetryEventService;

/// Run the retry scheduler as a background task.
pub async fn run_retry_scheduler(
    db: DatabaseConnection,
    enrollment: Arc<dyn EnrollmentApi>,
    config: RetryAppConfig,
) {
    info!(
        period_secs = config.scheduler_period_secs,
        "Starting retry scheduler"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.scheduler_period_secs));

    loop {
        interval.tick().await;

        if let Err(e) = run_retry_pass(&db, enrollment.as_ref()).await {
            error!(error = %e, "Retry pass failed");
        }
    }
}

/// One scheduler pass over all due OPEN events.
pub async fn run_retry_pass(
    db: &DatabaseConnection,
    enrollment: &dyn EnrollmentApi,
) -> anyhow::Result<()> {
    let due = RetryEventService::new(db).due_events(Utc::now()).await?;

    if due.is_empty() {
        return Ok(());
    }

    info!(count = due.len(), "Processing due retry events");

    for event in due {
        let event_id = event.id;
        if let Err(e) = process_due_event(db, enrollment, event).await {
            error!(event_id = %event_id, error = %e, "Retry attempt failed");
        }
    }

    Ok(())
}

/// Retry a single due event.
pub async fn process_due_event(
    db: &DatabaseConnection,
    enrollment: &dyn EnrollmentApi,
    event: retry_event::Model,
) -> anyhow::Result<()> {
    let service = RetryEventService::new(db);

    let Some(policy) = service.policy_for(&event.task_type).await? else {
        error!(
            event_id = %event.id,
            task_type = %event.task_type,
            "No retry policy configured for task type, leaving event untouched"
        );
        return Ok(());
    };

    if event.attempt_count >= policy.max_retry_count {
        warn!(
            event_id = %event.id,
            attempt_count = event.attempt_count,
            max_retry_count = policy.max_retry_count,
            "Attempt count already at cap, skipping"
        );
        return Ok(());
    }

    let payload: TaskPayload = serde_json::from_value(event.request_metadata.clone())?;
    let request = match &payload {
        TaskPayload::Onboarding(request) => request,
    };

    let signal = enrollment.enroll(request).await;
    let classification = classify(&signal);
    let plan = plan_transition(
        &signal,
        &classification,
        event.attempt_count,
        policy.max_retry_count,
        policy.retry_after_minutes as i64,
        Utc::now(),
    );

    if service.apply_transition(&event, &plan).await? {
        info!(
            event_id = %event.id,
            status = %plan.status,
            attempt_count = plan.attempt_count,
            status_code = signal.status_code,
            "Retry attempt recorded"
        );
    } else {
        warn!(
            event_id = %event.id,
            "Event advanced concurrently, skipping"
        );
    }

    Ok(())
}
