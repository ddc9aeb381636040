mod inmemory;
mod kafka;

pub use inmemory::{InMemoryBroker, InMemoryConsumer, InMemoryProducer};
pub use kafka::{KafkaConsumer, KafkaProducer};

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// A message pulled from the broker together with where it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Message broker is unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to publish message on topic {topic}: {cause}")]
    PublishFailed { topic: String, cause: String },
    #[error("Failed to receive message: {0}")]
    Receive(String),
    #[error("The broker client is disconnected")]
    Disconnected,
}

#[async_trait::async_trait]
pub trait IMessageProducer: Send + Sync {
    /// Creates the underlying client if it does not exist yet
    async fn connect(&self) -> Result<(), BrokerError>;
    /// Publishes the payload keyed by the partition key and waits for the
    /// broker acknowledgement
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BrokerError>;
    /// Flushes in flight messages and closes the client. Calling it more
    /// than once is a no-op.
    async fn disconnect(&self) -> Result<(), BrokerError>;
    fn is_connected(&self) -> bool;
}

#[async_trait::async_trait]
pub trait IMessageConsumer: Send + Sync {
    /// Verifies that the broker can be reached and joins the consumer group
    /// for the given topics. Subscribing again to the same topics is a no-op.
    async fn subscribe(&self, topics: &[String]) -> Result<(), BrokerError>;
    /// Waits for the next message. Returns `BrokerError::Disconnected` once
    /// the consumer has been disconnected.
    async fn recv(&self) -> Result<InboundMessage, BrokerError>;
    /// Marks the message as processed so that its offset gets committed
    fn ack(&self, message: &InboundMessage) -> Result<(), BrokerError>;
    async fn disconnect(&self) -> Result<(), BrokerError>;
    fn is_connected(&self) -> bool;
}

/// The two halves of the connection to the message broker
#[derive(Clone)]
pub struct Broker {
    pub producer: Arc<dyn IMessageProducer>,
    pub consumer: Arc<dyn IMessageConsumer>,
}

/// Serializes the payload to JSON and publishes it
pub async fn publish_json<T: Serialize + Sync>(
    producer: &dyn IMessageProducer,
    topic: &str,
    key: &str,
    payload: &T,
) -> Result<(), BrokerError> {
    let payload = serde_json::to_vec(payload).map_err(|e| BrokerError::PublishFailed {
        topic: topic.to_string(),
        cause: format!("Unable to serialize payload: {}", e),
    })?;
    producer.publish(topic, key, &payload).await
}
