pub mod retry_event;
pub mod retry_policy;
pub mod student;
