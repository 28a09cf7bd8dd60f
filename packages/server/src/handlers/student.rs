use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use common::{OnboardingMessage, OnboardingRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, SqlErr};
use tracing::{error, info, instrument};

use crate::entity::student;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::student::{DEFAULT_SCHOOL, StudentResponse, validate_onboarding};
use crate::retry::ingest;
use crate::state::AppState;

/// Onboard a new student.
#[utoipa::path(
    post,
    path = "",
    tag = "Students",
    operation_id = "createStudent",
    summary = "Onboard a new student",
    description = "Persists the student record and hands the enrollment request to the retry \
                   orchestration pipeline via the onboarding queue.",
    request_body = OnboardingRequest,
    responses(
        (status = 201, description = "Student created and onboarding started", body = StudentResponse),
        (status = 400, description = "Invalid request body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Student already exists (CONFLICT)", body = ErrorBody),
        (status = 500, description = "Enqueue or persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_student(
    State(state): State<AppState>,
    AppJson(payload): AppJson<OnboardingRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    validate_onboarding(&payload)?;

    let school = payload
        .school
        .clone()
        .unwrap_or_else(|| DEFAULT_SCHOOL.to_string());

    let model = student::ActiveModel {
        national_id: Set(payload.national_id.clone()),
        roll_no: Set(payload.roll_no.clone()),
        name: Set(payload.name.clone()),
        class_group: Set(payload.class_group.clone()),
        school: Set(school),
        date_of_birth: Set(payload.date_of_birth.clone()),
        created_at: Set(Utc::now()),
    };

    let inserted = match model.insert(&state.db).await {
        Ok(m) => m,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Conflict(format!(
                "Student {} already exists",
                payload.national_id
            )));
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(ref mq) = state.mq {
        let message = OnboardingMessage::new(payload.clone());
        mq.publish(
            &state.config.mq.onboarding_queue_name,
            None,
            &message,
            None,
        )
        .await
        .map_err(|e| {
            error!(
                national_id = %payload.national_id,
                error = %e,
                "Failed to enqueue onboarding message"
            );
            AppError::Internal(format!("Failed to enqueue onboarding message: {e}"))
        })?;

        info!(
            national_id = %payload.national_id,
            message_id = %message.message_id,
            "Enqueued onboarding message"
        );
    } else {
        // MQ disabled: ingest inline instead of enqueueing.
        ingest(
            &state.db,
            state.enrollment.as_ref(),
            &payload,
            state.config.retry.default_backoff_minutes,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    Ok((StatusCode::CREATED, Json(inserted.into())))
}

/// Get a student by identity number.
#[utoipa::path(
    get,
    path = "/{national_id}",
    tag = "Students",
    operation_id = "getStudent",
    summary = "Get a student by identity number",
    params(("national_id" = String, Path, description = "National identity number")),
    responses(
        (status = 200, description = "Student record", body = StudentResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = student::Entity::find_by_id(national_id.as_str())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {} not found", national_id)))?;

    Ok(Json(student.into()))
}
