use std::sync::Arc;

use common::OnboardingMessage;
use mq::{BroccoliError, BrokerMessage, Mq};
use sea_orm::DatabaseConnection;
use tracing::{error, info};

use crate::enrollment::EnrollmentApi;
use crate::retry::ingest;

/// Consume onboarding events from the queue and ingest them.
pub async fn consume_onboarding_events(
    db: DatabaseConnection,
    enrollment: Arc<dyn EnrollmentApi>,
    mq: Arc<Mq>,
    queue_name: String,
    default_backoff_minutes: i64,
) {
    info!(queue = %queue_name, "Starting onboarding consumer");

    let result = mq
        .process_messages(
            &queue_name,
            None, // single-threaded for sequential DB writes
            None,
            move |message: BrokerMessage<OnboardingMessage>| {
                let db = db.clone();
                let enrollment = enrollment.clone();
                async move {
                    let OnboardingMessage {
                        message_id,
                        request,
                    } = message.payload;

                    match ingest(&db, enrollment.as_ref(), &request, default_backoff_minutes).await
                    {
                        Ok(outcome) => {
                            info!(
                                message_id = %message_id,
                                national_id = %request.national_id,
                                outcome = ?outcome,
                                "Processed onboarding message"
                            );
                            Ok(())
                        }
                        Err(e) => {
                            error!(
                                message_id = %message_id,
                                national_id = %request.national_id,
                                error = %e,
                                "Failed to ingest onboarding message"
                            );
                            Err(BroccoliError::Job(e.to_string()))
                        }
                    }
                }
            },
        )
        .await;

    if let Err(e) = result {
        error!(error = %e, "Onboarding consumer stopped unexpectedly");
    }
}
