pub mod ingest;
pub mod scheduler;
pub mod service;

pub use ingest::{IngestOutcome, ingest};
pub use scheduler::run_retry_scheduler;
pub use service::{InsertOutcome, RetryEventService, retry_event_service};
