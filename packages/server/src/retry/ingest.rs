use chrono::{Duration, Utc};
use common::{
    OnboardingRequest, ResponseMetadata, RetryStatus, TaskPayload, classify,
};
use sea_orm::{ConnectionTrait, Set};
use tracing::info;
use uuid::Uuid;

use crate::enrollment::EnrollmentApi;
use crate::entity::retry_event;

use super::{InsertOutcome, RetryEventService};

/// Result of ingesting one onboarding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Created {
        event_id: Uuid,
        status: RetryStatus,
    },
    /// An event for this (correlation_key, task_type) already exists; no
    /// downstream call was made.
    Duplicate,
}

/// Idempotently ingest an onboarding request.
///
/// Performs the first enrollment attempt (attempt 0) and records the event
/// with the classified initial status. When the event stays OPEN, the due
/// time uses the policy backoff if a policy row exists, else the configured
/// default.
pub async fn ingest<C: ConnectionTrait>(
    conn: &C,
    enrollment: &dyn EnrollmentApi,
    request: &OnboardingRequest,
    default_backoff_minutes: i64,
) -> anyhow::Result<IngestOutcome> {
    let service = RetryEventService::new(conn);
    let payload = TaskPayload::Onboarding(request.clone());
    let task_type = payload.task_type();
    let correlation_key = payload.correlation_key().to_string();

    if let Some(existing) = service.find_by_request(&correlation_key, task_type).await? {
        info!(
            correlation_key = %correlation_key,
            task_type,
            event_id = %existing.id,
            "Event already exists, skipping ingestion"
        );
        return Ok(IngestOutcome::Duplicate);
    }

    let signal = enrollment.enroll(request).await;
    let classification = classify(&signal);
    let status = classification.outcome.initial_status();

    let backoff_minutes = service
        .policy_for(task_type)
        .await?
        .map(|p| p.retry_after_minutes as i64)
        .unwrap_or(default_backoff_minutes);

    let now = Utc::now();
    let next_run_at = (status == RetryStatus::Open).then(|| now + Duration::minutes(backoff_minutes));
    let response = ResponseMetadata::new(&signal, &classification);

    let model = retry_event::ActiveModel {
        id: Set(Uuid::new_v4()),
        correlation_key: Set(correlation_key.clone()),
        task_type: Set(task_type.to_string()),
        status: Set(status),
        attempt_count: Set(0),
        request_metadata: Set(serde_json::to_value(&payload)?),
        response_metadata: Set(Some(serde_json::to_value(&response)?)),
        next_run_at: Set(next_run_at),
        last_run_at: Set(now),
        created_at: Set(now),
    };

    match service.insert_new(model).await? {
        InsertOutcome::Inserted(event) => {
            info!(
                correlation_key = %correlation_key,
                task_type,
                event_id = %event.id,
                status = %event.status,
                status_code = signal.status_code,
                "Ingested onboarding event"
            );
            Ok(IngestOutcome::Created {
                event_id: event.id,
                status: event.status,
            })
        }
        InsertOutcome::DuplicateKey => {
            info!(
                correlation_key = %correlation_key,
                task_type,
                "Concurrent ingestion detected, treating as duplicate"
            );
            Ok(IngestOutcome::Duplicate)
        }
    }
}
