use common::TASK_TYPE_ONBOARDING;
use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{retry_event, retry_policy};

/// Default retry policies seeded on startup: (task_type, max_retry_count,
/// retry_after_minutes).
const DEFAULT_POLICIES: &[(&str, i32, i32)] = &[(TASK_TYPE_ONBOARDING, 3, 5)];

/// Seed the `retry_policy` table with defaults.
pub async fn seed_retry_policies(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &(task_type, max_retry_count, retry_after_minutes) in DEFAULT_POLICIES {
        let model = retry_policy::ActiveModel {
            task_type: Set(task_type.to_string()),
            max_retry_count: Set(max_retry_count),
            retry_after_minutes: Set(retry_after_minutes),
        };

        let result = retry_policy::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(retry_policy::Column::TaskType)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new retry policies", inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes, so we create
/// them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Unique index enforcing one event per logical request. Ingestion dedup
    // relies on it, so failure to create it is fatal.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_retry_event_correlation_task")
        .table(retry_event::Entity)
        .col(retry_event::Column::CorrelationKey)
        .col(retry_event::Column::TaskType)
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;
    info!("Ensured unique index idx_retry_event_correlation_task exists");

    // Composite index for the scheduler's due-event scan:
    // SELECT * FROM retry_event WHERE status = 'OPEN' AND next_run_at <= ?
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_retry_event_status_next_run")
        .table(retry_event::Entity)
        .col(retry_event::Column::Status)
        .col(retry_event::Column::NextRunAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_retry_event_status_next_run exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_retry_event_status_next_run: {}", e);
        }
    }

    Ok(())
}
