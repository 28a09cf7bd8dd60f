pub mod retry_event;
pub mod student;
