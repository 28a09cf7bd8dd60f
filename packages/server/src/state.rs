use std::sync::Arc;

use mq::Mq;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::enrollment::EnrollmentApi;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// None when MQ is disabled; onboarding then runs inline.
    pub mq: Option<Arc<Mq>>,
    pub enrollment: Arc<dyn EnrollmentApi>,
    pub config: Arc<AppConfig>,
}
