use common::{MqAppConfig, RetryAppConfig};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Which enrollment client to construct.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentMode {
    /// Deterministic stub keyed off the identity number.
    Simulated,
    /// Real HTTP client against `base_url`.
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnrollmentConfig {
    pub mode: EnrollmentMode,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub mq: MqAppConfig,
    #[serde(default)]
    pub retry: RetryAppConfig,
    pub enrollment: EnrollmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("enrollment.mode", "simulated")?
            .set_default("enrollment.base_url", "http://localhost:8080")?
            .set_default("enrollment.timeout_secs", 10)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., ONBOARD__DATABASE__URL)
            .add_source(Environment::with_prefix("ONBOARD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
