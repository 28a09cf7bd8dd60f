use axum::{
    Json,
    extract::{Path, Query, State},
};
use common::RetryStatus;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::models::retry_event::*;
use crate::models::shared::Pagination;
use crate::retry::retry_event_service;
use crate::state::AppState;

/// List retry events.
#[utoipa::path(
    get,
    path = "",
    tag = "Retry Events",
    operation_id = "listRetryEvents",
    summary = "List retry events",
    description = "Returns a paginated list of retry orchestration events, newest first.",
    params(ListRetryEventParams),
    responses(
        (status = 200, description = "List of retry events", body = RetryEventListResponse),
        (status = 400, description = "Invalid filter (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_retry_events(
    State(state): State<AppState>,
    Query(params): Query<ListRetryEventParams>,
) -> Result<Json<RetryEventListResponse>, AppError> {
    let status = params
        .status
        .map(|s| s.parse::<RetryStatus>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    let service = retry_event_service(&state.db);
    let (events, total) = service
        .list(status, params.task_type, page, per_page)
        .await?;

    let data: Vec<RetryEventResponse> = events.into_iter().map(Into::into).collect();
    let total_pages = total.div_ceil(per_page);

    Ok(Json(RetryEventListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// Get a single retry event by ID.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Retry Events",
    operation_id = "getRetryEvent",
    summary = "Get retry event details",
    description = "Returns full details of a retry event including the request snapshot and the \
                   latest downstream response.",
    params(("id" = Uuid, Path, description = "Retry event ID")),
    responses(
        (status = 200, description = "Retry event details", body = RetryEventDetailResponse),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_retry_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RetryEventDetailResponse>, AppError> {
    let service = retry_event_service(&state.db);
    let event = service
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Retry event {} not found", id)))?;

    Ok(Json(event.into()))
}
