use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::{Classification, EnrollmentSignal, Outcome};
use crate::retry_status::RetryStatus;

/// Snapshot of the most recent downstream response, persisted on the event
/// and overwritten each attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub status_code: u16,
    pub message: String,
}

impl ResponseMetadata {
    pub fn new(signal: &EnrollmentSignal, classification: &Classification) -> Self {
        Self {
            status_code: signal.status_code,
            message: classification.message.to_string(),
        }
    }
}

/// The fully-computed result of one retry attempt, ready to be persisted
/// as a single atomic write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub status: RetryStatus,
    pub attempt_count: i32,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_run_at: DateTime<Utc>,
    pub response: ResponseMetadata,
}

/// Advance a retry event by one attempt.
///
/// `attempt_count` is the event's count before this attempt; the returned
/// plan carries the incremented count for retryable failures and the
/// unchanged count for terminal outcomes reached directly. Terminal plans
/// always clear `next_run_at`.
pub fn plan_transition(
    signal: &EnrollmentSignal,
    classification: &Classification,
    attempt_count: i32,
    max_retry_count: i32,
    retry_after_minutes: i64,
    now: DateTime<Utc>,
) -> TransitionPlan {
    let response = ResponseMetadata::new(signal, classification);

    match classification.outcome {
        Outcome::Success => TransitionPlan {
            status: RetryStatus::Closed,
            attempt_count,
            next_run_at: None,
            last_run_at: now,
            response,
        },
        Outcome::NonRetryableFailure => TransitionPlan {
            status: RetryStatus::Failed,
            attempt_count,
            next_run_at: None,
            last_run_at: now,
            response,
        },
        Outcome::RetryableFailure => {
            let next_attempt = attempt_count + 1;
            if next_attempt >= max_retry_count {
                // Exhausted: the cap is inclusive on attempt_count.
                TransitionPlan {
                    status: RetryStatus::Failed,
                    attempt_count: next_attempt,
                    next_run_at: None,
                    last_run_at: now,
                    response,
                }
            } else {
                TransitionPlan {
                    status: RetryStatus::Open,
                    attempt_count: next_attempt,
                    next_run_at: Some(now + Duration::minutes(retry_after_minutes)),
                    last_run_at: now,
                    response,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::classify;

    fn plan(code: u16, attempt: i32, max: i32, now: DateTime<Utc>) -> TransitionPlan {
        let signal = EnrollmentSignal::new(code);
        let classification = classify(&signal);
        plan_transition(&signal, &classification, attempt, max, 5, now)
    }

    #[test]
    fn test_success_closes_at_any_attempt() {
        let now = Utc::now();
        for attempt in [0, 1, 2] {
            let p = plan(200, attempt, 3, now);
            assert_eq!(p.status, RetryStatus::Closed);
            assert_eq!(p.attempt_count, attempt);
            assert_eq!(p.next_run_at, None);
            assert_eq!(p.response.message, "enrolled successfully");
        }
    }

    #[test]
    fn test_conflict_fails_immediately() {
        let now = Utc::now();
        let p = plan(409, 0, 3, now);
        assert_eq!(p.status, RetryStatus::Failed);
        assert_eq!(p.attempt_count, 0);
        assert_eq!(p.next_run_at, None);
        assert_eq!(p.response.message, "already enrolled");
    }

    #[test]
    fn test_retryable_increments_and_schedules() {
        let now = Utc::now();
        let p = plan(500, 0, 3, now);
        assert_eq!(p.status, RetryStatus::Open);
        assert_eq!(p.attempt_count, 1);
        assert_eq!(p.next_run_at, Some(now + Duration::minutes(5)));
        assert_eq!(p.last_run_at, now);
    }

    #[test]
    fn test_exhaustion_scenario_max_three() {
        // Policy {max_retry_count: 3, retry_after_minutes: 5}: three
        // consecutive retryable failures walk the count 1, 2, 3 and fail
        // exactly when the count reaches the cap.
        let now = Utc::now();

        let p1 = plan(500, 0, 3, now);
        assert_eq!((p1.status, p1.attempt_count), (RetryStatus::Open, 1));

        let p2 = plan(500, p1.attempt_count, 3, now);
        assert_eq!((p2.status, p2.attempt_count), (RetryStatus::Open, 2));

        let p3 = plan(500, p2.attempt_count, 3, now);
        assert_eq!((p3.status, p3.attempt_count), (RetryStatus::Failed, 3));
        assert_eq!(p3.next_run_at, None);
    }

    #[test]
    fn test_attempt_count_never_exceeds_cap_on_exhaustion() {
        let now = Utc::now();
        for max in [1, 2, 5] {
            let p = plan(500, max - 1, max, now);
            assert_eq!(p.status, RetryStatus::Failed);
            assert_eq!(p.attempt_count, max);
        }
    }

    #[test]
    fn test_attempt_count_is_monotone() {
        let now = Utc::now();
        for code in [200u16, 400, 409, 500] {
            let p = plan(code, 2, 10, now);
            assert!(p.attempt_count >= 2);
        }
    }

    #[test]
    fn test_backoff_uses_policy_minutes() {
        let now = Utc::now();
        let signal = EnrollmentSignal::new(503);
        let classification = classify(&signal);
        let p = plan_transition(&signal, &classification, 0, 5, 15, now);
        assert_eq!(p.next_run_at, Some(now + Duration::minutes(15)));
    }

    #[test]
    fn test_response_metadata_overwritten_per_attempt() {
        let now = Utc::now();
        let p = plan(502, 0, 3, now);
        assert_eq!(p.response.status_code, 502);
        assert_eq!(p.response.message, "internal error");
    }
}
