use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task type for student onboarding events; also the lookup key for the
/// retry policy that governs them.
pub const TASK_TYPE_ONBOARDING: &str = "STUDENT_ONBOARDING";

/// An onboarding request as received from upstream.
///
/// `national_id` doubles as the correlation key: at most one retry event per
/// (national_id, task_type) pair ever exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OnboardingRequest {
    pub national_id: String,
    pub roll_no: String,
    pub name: String,
    pub class_group: String,
    #[serde(default)]
    pub school: Option<String>,
    pub date_of_birth: String,
}

/// Immutable request payload stored on a retry event, tagged by task type so
/// the scheduler can replay it without knowing which kind of event it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "task_type")]
pub enum TaskPayload {
    #[serde(rename = "STUDENT_ONBOARDING")]
    Onboarding(OnboardingRequest),
}

impl TaskPayload {
    pub fn task_type(&self) -> &'static str {
        match self {
            Self::Onboarding(_) => TASK_TYPE_ONBOARDING,
        }
    }

    pub fn correlation_key(&self) -> &str {
        match self {
            Self::Onboarding(request) => &request.national_id,
        }
    }
}

/// Queue message carrying one onboarding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingMessage {
    pub message_id: String,
    pub request: OnboardingRequest,
}

impl OnboardingMessage {
    pub fn new(request: OnboardingRequest) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OnboardingRequest {
        OnboardingRequest {
            national_id: "9220".to_string(),
            roll_no: "R-17".to_string(),
            name: "Asha Verma".to_string(),
            class_group: "7B".to_string(),
            school: None,
            date_of_birth: "2012-04-19".to_string(),
        }
    }

    #[test]
    fn test_payload_tagging() {
        let payload = TaskPayload::Onboarding(request());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["task_type"], "STUDENT_ONBOARDING");
        assert_eq!(json["national_id"], "9220");

        let parsed: TaskPayload = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_correlation_key_is_national_id() {
        let payload = TaskPayload::Onboarding(request());
        assert_eq!(payload.correlation_key(), "9220");
        assert_eq!(payload.task_type(), TASK_TYPE_ONBOARDING);
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = OnboardingMessage::new(request());
        let b = OnboardingMessage::new(request());
        assert_ne!(a.message_id, b.message_id);
    }
}
