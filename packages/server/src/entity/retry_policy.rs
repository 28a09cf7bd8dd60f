use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-task-type retry policy. Read-only from the orchestration core;
/// seeded on startup.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "retry_policy")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub task_type: String,

    /// Inclusive cap on attempt_count.
    pub max_retry_count: i32,

    /// Fixed backoff in minutes between attempts.
    pub retry_after_minutes: i32,
}

impl ActiveModelBehavior for ActiveModel {}
