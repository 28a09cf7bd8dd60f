use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::retry_event;

use super::shared::Pagination;

/// Query parameters for listing retry events.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListRetryEventParams {
    /// Filter by status (OPEN, CLOSED, FAILED).
    #[param(example = "OPEN")]
    pub status: Option<String>,
    /// Filter by task type.
    #[param(example = "STUDENT_ONBOARDING")]
    pub task_type: Option<String>,
    /// Page number (1-indexed).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    #[param(example = 20)]
    pub per_page: Option<u64>,
}

/// Retry event summary for list views.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RetryEventResponse {
    pub id: Uuid,
    #[schema(example = "9222")]
    pub correlation_key: String,
    #[schema(example = "STUDENT_ONBOARDING")]
    pub task_type: String,
    #[schema(example = "OPEN")]
    pub status: String,
    #[schema(example = 2)]
    pub attempt_count: i32,
    /// Due time of the next attempt (null once terminal).
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_run_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<retry_event::Model> for RetryEventResponse {
    fn from(m: retry_event::Model) -> Self {
        Self {
            id: m.id,
            correlation_key: m.correlation_key,
            task_type: m.task_type,
            status: m.status.to_string(),
            attempt_count: m.attempt_count,
            next_run_at: m.next_run_at,
            last_run_at: m.last_run_at,
            created_at: m.created_at,
        }
    }
}

/// Full retry event details including both metadata blobs.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RetryEventDetailResponse {
    pub id: Uuid,
    #[schema(example = "9222")]
    pub correlation_key: String,
    #[schema(example = "STUDENT_ONBOARDING")]
    pub task_type: String,
    #[schema(example = "OPEN")]
    pub status: String,
    #[schema(example = 2)]
    pub attempt_count: i32,
    /// Immutable request snapshot replayed on each retry.
    pub request_metadata: serde_json::Value,
    /// Latest downstream response as {status_code, message}.
    pub response_metadata: Option<serde_json::Value>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_run_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<retry_event::Model> for RetryEventDetailResponse {
    fn from(m: retry_event::Model) -> Self {
        Self {
            id: m.id,
            correlation_key: m.correlation_key,
            task_type: m.task_type,
            status: m.status.to_string(),
            attempt_count: m.attempt_count,
            request_metadata: m.request_metadata,
            response_metadata: m.response_metadata,
            next_run_at: m.next_run_at,
            last_run_at: m.last_run_at,
            created_at: m.created_at,
        }
    }
}

/// Paginated list of retry events.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RetryEventListResponse {
    pub data: Vec<RetryEventResponse>,
    pub pagination: Pagination,
}
