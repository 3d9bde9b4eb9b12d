use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use super::{Message, MessageBus, MessagingResult};

const CHANNEL_CAPACITY: usize = 256;

/// In-memory implementation of [`MessageBus`] over a broadcast channel
/// (for development/testing).
///
/// Lagged subscribers lose the oldest messages, matching the contract's
/// no-delivery-guarantee semantics.
#[derive(Debug, Clone)]
pub struct InMemoryMessageBus {
    tx: broadcast::Sender<Message>,
}

impl InMemoryMessageBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Number of currently attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Readiness probe: the channel never degrades, so this always passes
    pub async fn health_check(&self) -> MessagingResult<()> {
        Ok(())
    }
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryMessageBus {
    async fn publish(&self, subject: &str, payload: Value) -> MessagingResult<()> {
        let message = Message {
            subject: subject.to_string(),
            payload,
        };

        // A send error only means there are no subscribers right now, which
        // is fine for fire-and-forget delivery.
        match self.tx.send(message) {
            Ok(receivers) => {
                debug!(subject = %subject, receivers, "Message published");
            }
            Err(_) => {
                debug!(subject = %subject, "Message published with no subscribers");
            }
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.tx.subscribe()
    }
}
