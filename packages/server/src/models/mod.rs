pub mod retry_event;
pub mod shared;
pub mod student;
