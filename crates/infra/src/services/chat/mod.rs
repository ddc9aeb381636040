mod inmemory;
mod message;
mod webhook;

pub use inmemory::InMemoryDeliveryAdapter;
pub use message::{ChatEmbed, ChatEmbedField, ChatMessage};
pub use webhook::WebhookChatClient;

use nettu_notifier_domain::NotificationMessage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("The chat client is not ready")]
    NotReady,
    #[error("Unable to reach the chat platform: {0}")]
    Transport(String),
    #[error("The chat platform rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Hands notifications over to the chat platform
#[async_trait::async_trait]
pub trait IDeliveryAdapter: Send + Sync {
    /// Performs the handshake with the chat platform. The adapter is ready
    /// afterwards.
    async fn connect(&self) -> Result<(), DeliveryError>;
    fn is_ready(&self) -> bool;
    /// Renders the notification into the platform payload and posts it.
    /// Fails with `DeliveryError::NotReady` without doing any io when the
    /// adapter is not ready.
    async fn send(&self, notification: &NotificationMessage) -> Result<(), DeliveryError>;
    /// Marks the adapter as not ready. Calling it more than once is a no-op.
    async fn stop(&self);
}
