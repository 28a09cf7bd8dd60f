use serde::{Deserialize, Serialize};

use crate::retry_status::RetryStatus;

/// Response signal observed from the downstream enrollment endpoint.
///
/// The orchestration core only depends on the status code; everything else
/// about the downstream response is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentSignal {
    pub status_code: u16,
}

impl EnrollmentSignal {
    pub fn new(status_code: u16) -> Self {
        Self { status_code }
    }
}

/// Terminal disposition of a single enrollment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Enrollment succeeded; the event closes.
    Success,
    /// Transient downstream failure; the event stays open while attempts remain.
    RetryableFailure,
    /// Business rejection or unrecognized response; the event fails immediately.
    NonRetryableFailure,
}

impl Outcome {
    /// Status recorded for a freshly ingested event (attempt 0, no exhaustion
    /// check applies yet).
    pub fn initial_status(&self) -> RetryStatus {
        match self {
            Self::Success => RetryStatus::Closed,
            Self::RetryableFailure => RetryStatus::Open,
            Self::NonRetryableFailure => RetryStatus::Failed,
        }
    }
}

/// Result of classifying a downstream response signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub outcome: Outcome,
    pub message: &'static str,
}

/// Map a downstream response signal to an attempt outcome.
///
/// This table is the single source of truth for both the ingestion path and
/// the retry scheduler; it is total and deterministic. 409 is terminal by
/// policy: a conflict means the subject is already enrolled downstream and
/// retrying cannot change that.
pub fn classify(signal: &EnrollmentSignal) -> Classification {
    match signal.status_code {
        200 => Classification {
            outcome: Outcome::Success,
            message: "enrolled successfully",
        },
        409 => Classification {
            outcome: Outcome::NonRetryableFailure,
            message: "already enrolled",
        },
        500..=599 => Classification {
            outcome: Outcome::RetryableFailure,
            message: "internal error",
        },
        _ => Classification {
            outcome: Outcome::NonRetryableFailure,
            message: "unrecognized response",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        assert_eq!(
            classify(&EnrollmentSignal::new(200)).outcome,
            Outcome::Success
        );
        assert_eq!(
            classify(&EnrollmentSignal::new(409)).outcome,
            Outcome::NonRetryableFailure
        );
        assert_eq!(
            classify(&EnrollmentSignal::new(500)).outcome,
            Outcome::RetryableFailure
        );
        assert_eq!(
            classify(&EnrollmentSignal::new(503)).outcome,
            Outcome::RetryableFailure
        );
        assert_eq!(
            classify(&EnrollmentSignal::new(599)).outcome,
            Outcome::RetryableFailure
        );
        assert_eq!(
            classify(&EnrollmentSignal::new(400)).outcome,
            Outcome::NonRetryableFailure
        );
        assert_eq!(
            classify(&EnrollmentSignal::new(201)).outcome,
            Outcome::NonRetryableFailure
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        for code in [200u16, 400, 409, 500, 502, 404, 302] {
            let a = classify(&EnrollmentSignal::new(code));
            let b = classify(&EnrollmentSignal::new(code));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            classify(&EnrollmentSignal::new(200)).message,
            "enrolled successfully"
        );
        assert_eq!(
            classify(&EnrollmentSignal::new(409)).message,
            "already enrolled"
        );
        assert_eq!(
            classify(&EnrollmentSignal::new(500)).message,
            "internal error"
        );
        assert_eq!(
            classify(&EnrollmentSignal::new(418)).message,
            "unrecognized response"
        );
    }

    #[test]
    fn test_initial_status_mapping() {
        assert_eq!(Outcome::Success.initial_status(), RetryStatus::Closed);
        assert_eq!(Outcome::RetryableFailure.initial_status(), RetryStatus::Open);
        assert_eq!(
            Outcome::NonRetryableFailure.initial_status(),
            RetryStatus::Failed
        );
    }
}
