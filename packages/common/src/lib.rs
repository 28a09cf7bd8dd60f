pub mod config;
pub mod onboarding;
pub mod outcome;
pub mod retry;
pub mod retry_status;

pub use config::{MqAppConfig, RetryAppConfig};
pub use onboarding::{OnboardingMessage, OnboardingRequest, TASK_TYPE_ONBOARDING, TaskPayload};
pub use outcome::{Classification, EnrollmentSignal, Outcome, classify};
pub use retry::{ResponseMetadata, TransitionPlan, plan_transition};
pub use retry_status::RetryStatus;
