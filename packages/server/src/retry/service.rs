use chrono::{DateTime, Utc};
use common::{RetryStatus, TransitionPlan};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, sea_query::Expr,
};
use uuid::Uuid;

use crate::entity::{retry_event, retry_policy};

/// Result of inserting a new retry event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(retry_event::Model),
    /// The (correlation_key, task_type) unique index rejected the row; a
    /// concurrent writer got there first.
    DuplicateKey,
}

pub struct RetryEventService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RetryEventService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Find the event for a logical request, if any.
    pub async fn find_by_request(
        &self,
        correlation_key: &str,
        task_type: &str,
    ) -> Result<Option<retry_event::Model>, DbErr> {
        retry_event::Entity::find()
            .filter(retry_event::Column::CorrelationKey.eq(correlation_key))
            .filter(retry_event::Column::TaskType.eq(task_type))
            .one(self.conn)
            .await
    }

    /// Look up the retry policy governing a task type.
    pub async fn policy_for(&self, task_type: &str) -> Result<Option<retry_policy::Model>, DbErr> {
        retry_policy::Entity::find_by_id(task_type).one(self.conn).await
    }

    /// All OPEN events whose due time has passed, oldest due first.
    pub async fn due_events(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<retry_event::Model>, DbErr> {
        retry_event::Entity::find()
            .filter(retry_event::Column::Status.eq(RetryStatus::Open))
            .filter(retry_event::Column::NextRunAt.lte(now))
            .order_by_asc(retry_event::Column::NextRunAt)
            .all(self.conn)
            .await
    }

    /// Insert a new event, mapping a unique-index violation to `DuplicateKey`.
    pub async fn insert_new(
        &self,
        model: retry_event::ActiveModel,
    ) -> Result<InsertOutcome, DbErr> {
        match model.insert(self.conn).await {
            Ok(inserted) => Ok(InsertOutcome::Inserted(inserted)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(InsertOutcome::DuplicateKey)
            }
            Err(e) => Err(e),
        }
    }

    /// Persist a transition plan as one conditional update.
    ///
    /// The filter on the pre-transition `attempt_count` makes the write an
    /// optimistic compare-and-set: returns false when zero rows were
    /// affected, meaning a concurrent writer already advanced the event.
    pub async fn apply_transition(
        &self,
        event: &retry_event::Model,
        plan: &TransitionPlan,
    ) -> Result<bool, DbErr> {
        let response = serde_json::to_value(&plan.response)
            .map_err(|e| DbErr::Custom(format!("Failed to serialize response metadata: {e}")))?;

        let result = retry_event::Entity::update_many()
            .col_expr(retry_event::Column::Status, Expr::value(plan.status))
            .col_expr(
                retry_event::Column::AttemptCount,
                Expr::value(plan.attempt_count),
            )
            .col_expr(retry_event::Column::NextRunAt, Expr::value(plan.next_run_at))
            .col_expr(retry_event::Column::LastRunAt, Expr::value(plan.last_run_at))
            .col_expr(
                retry_event::Column::ResponseMetadata,
                Expr::value(Some(response)),
            )
            .filter(retry_event::Column::Id.eq(event.id))
            .filter(retry_event::Column::AttemptCount.eq(event.attempt_count))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// List events for observability, newest first.
    pub async fn list(
        &self,
        status: Option<RetryStatus>,
        task_type: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<retry_event::Model>, u64), DbErr> {
        let mut query = retry_event::Entity::find();

        if let Some(status) = status {
            query = query.filter(retry_event::Column::Status.eq(status));
        }

        if let Some(task_type) = task_type {
            query = query.filter(retry_event::Column::TaskType.eq(task_type));
        }

        let total = query.clone().count(self.conn).await?;

        let events = query
            .order_by_desc(retry_event::Column::CreatedAt)
            .offset((page.saturating_sub(1)) * per_page)
            .limit(per_page)
            .all(self.conn)
            .await?;

        Ok((events, total))
    }

    /// Get a single event by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<retry_event::Model>, DbErr> {
        retry_event::Entity::find_by_id(id).one(self.conn).await
    }
}

/// Create a RetryEventService with a DatabaseConnection.
pub fn retry_event_service(db: &DatabaseConnection) -> RetryEventService<'_, DatabaseConnection> {
    RetryEventService::new(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::testutil::open_event;
    use common::{Classification, EnrollmentSignal, classify, plan_transition};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn retryable_plan(event: &retry_event::Model) -> TransitionPlan {
        let signal = EnrollmentSignal::new(500);
        let classification: Classification = classify(&signal);
        plan_transition(
            &signal,
            &classification,
            event.attempt_count,
            3,
            5,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_apply_transition_reports_applied() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let event = open_event("5552", 0);
        let plan = retryable_plan(&event);

        let applied = RetryEventService::new(&db)
            .apply_transition(&event, &plan)
            .await
            .unwrap();
        assert!(applied);
    }

    #[tokio::test]
    async fn test_apply_transition_detects_concurrent_writer() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let event = open_event("5552", 1);
        let plan = retryable_plan(&event);

        let applied = RetryEventService::new(&db)
            .apply_transition(&event, &plan)
            .await
            .unwrap();
        assert!(!applied);
    }

    #[tokio::test]
    async fn test_due_events_selects_only_open() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<retry_event::Model>::new()])
            .into_connection();

        RetryEventService::new(&db)
            .due_events(Utc::now())
            .await
            .unwrap();

        // Terminal events must never be picked up again, even with a stale
        // next_run_at still set; the query itself has to fence them out.
        let log = db.into_transaction_log();
        let stmt = format!("{:?}", log[0]);
        assert!(stmt.contains(r#"\"status\" = "#), "statement: {stmt}");
        assert!(stmt.contains("OPEN"), "statement: {stmt}");
        assert!(stmt.contains(r#"\"next_run_at\" <= "#), "statement: {stmt}");
    }

    #[tokio::test]
    async fn test_find_by_request_returns_existing() {
        let existing = open_event("7770", 0);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()]])
            .into_connection();

        let found = RetryEventService::new(&db)
            .find_by_request(&existing.correlation_key, &existing.task_type)
            .await
            .unwrap();
        assert_eq!(found, Some(existing));
    }
}
