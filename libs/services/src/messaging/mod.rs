//! Message bus contract and in-memory implementation.
//!
//! Delivery is fire-and-forget: there are no acknowledgements, no replay,
//! and slow subscribers may drop messages.

pub mod memory;

pub use memory::InMemoryMessageBus;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Message serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Message bus error: {0}")]
    Backend(String),
}

pub type MessagingResult<T> = Result<T, MessagingError>;

/// A published message: subject plus JSON payload
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub subject: String,
    pub payload: Value,
}

/// Publish/subscribe message bus.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publish a message to a subject. Succeeds even with zero subscribers.
    async fn publish(&self, subject: &str, payload: Value) -> MessagingResult<()>;

    /// Subscribe to all messages published after this call
    fn subscribe(&self) -> broadcast::Receiver<Message>;
}
