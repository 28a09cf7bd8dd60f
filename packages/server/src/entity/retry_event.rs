use common::RetryStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One logical onboarding request being orchestrated against the downstream
/// enrollment system. At most one row exists per (correlation_key, task_type);
/// the composite unique index is created on startup.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "retry_event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Natural key of the logical request (the student's identity number).
    #[sea_orm(indexed)]
    pub correlation_key: String,

    #[sea_orm(indexed)]
    pub task_type: String,

    #[sea_orm(indexed)]
    pub status: RetryStatus,

    /// 0 at creation, +1 per scheduler retry. Also serves as the optimistic
    /// concurrency token for persisted transitions.
    pub attempt_count: i32,

    /// Immutable snapshot of the typed request payload; retries replay it.
    #[sea_orm(column_type = "JsonBinary")]
    pub request_metadata: serde_json::Value,

    /// Latest downstream response as {status_code, message}; overwritten
    /// each attempt.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub response_metadata: Option<serde_json::Value>,

    /// Due time while OPEN; NULL once terminal.
    #[sea_orm(indexed)]
    pub next_run_at: Option<DateTimeUtc>,

    pub last_run_at: DateTimeUtc,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
