use serde::Deserialize;

/// App-level MQ configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct MqAppConfig {
    /// Whether MQ is enabled. Default: true.
    /// When disabled, onboarding requests are ingested inline by the API.
    #[serde(default = "default_mq_enabled")]
    pub enabled: bool,
    /// Redis connection URL. Default: "redis://localhost:6379".
    #[serde(default = "default_mq_url")]
    pub url: String,
    /// Connection pool size. Default: 5.
    #[serde(default = "default_mq_pool_size")]
    pub pool_size: u8,
    /// Queue name for onboarding events (API publishes, consumer ingests).
    /// Default: "student-onboarding".
    #[serde(default = "default_onboarding_queue_name")]
    pub onboarding_queue_name: String,
}

fn default_mq_enabled() -> bool {
    true
}
fn default_mq_url() -> String {
    "redis://localhost:6379".into()
}
fn default_mq_pool_size() -> u8 {
    5
}
fn default_onboarding_queue_name() -> String {
    "student-onboarding".into()
}

impl Default for MqAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_mq_enabled(),
            url: default_mq_url(),
            pool_size: default_mq_pool_size(),
            onboarding_queue_name: default_onboarding_queue_name(),
        }
    }
}

/// App-level retry scheduler configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct RetryAppConfig {
    /// Seconds between scheduler passes over due events. Default: 60.
    #[serde(default = "default_scheduler_period_secs")]
    pub scheduler_period_secs: u64,
    /// Backoff applied at ingestion when no retry policy exists for the
    /// task type. Default: 5 minutes.
    #[serde(default = "default_backoff_minutes")]
    pub default_backoff_minutes: i64,
}

fn default_scheduler_period_secs() -> u64 {
    60
}
fn default_backoff_minutes() -> i64 {
    5
}

impl Default for RetryAppConfig {
    fn default() -> Self {
        Self {
            scheduler_period_secs: default_scheduler_period_secs(),
            default_backoff_minutes: default_backoff_minutes(),
        }
    }
}
