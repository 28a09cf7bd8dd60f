use broccoli_queue::queue::BroccoliQueueBuilder;
pub use broccoli_queue::{
    brokers::broker::BrokerMessage,
    error::BroccoliError,
    queue::{BroccoliQueue, ConsumeOptions, PublishOptions},
};
use thiserror::Error;

pub type Mq = BroccoliQueue;
pub type MqBuilder = BroccoliQueueBuilder;

#[derive(Debug, Error)]
pub enum MqError {
    #[error("{0}")]
    Internal(String),
}

impl From<BroccoliError> for MqError {
    fn from(e: BroccoliError) -> Self {
        MqError::Internal(e.to_string())
    }
}

pub struct MqConfig {
    pub url: String,
    pub pool_size: u8,
}

pub async fn init_mq(config: MqConfig) -> Result<Mq, MqError> {
    BroccoliQueue::builder(&config.url)
        .pool_connections(config.pool_size)
        .build()
        .await
        .map_err(MqError::from)
}
