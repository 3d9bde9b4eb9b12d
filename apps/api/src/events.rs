//! Domain event publication.
//!
//! Events are emitted after successful mutations so other components can
//! react without coupling to the API. Delivery is fire-and-forget: a publish
//! failure is logged and never surfaces to the API caller.

use std::sync::Arc;

use domain_users::UserDto;
use serde_json::{Value, json};
use services::MessageBus;
use tracing::warn;
use uuid::Uuid;

pub const USER_CREATED: &str = "users.created";
pub const USER_UPDATED: &str = "users.updated";
pub const USER_DELETED: &str = "users.deleted";

#[derive(Clone)]
pub struct EventPublisher {
    bus: Arc<dyn MessageBus>,
}

impl EventPublisher {
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self { bus }
    }

    pub async fn user_created(&self, user: &UserDto) {
        self.publish(USER_CREATED, user_payload(user)).await;
    }

    pub async fn user_updated(&self, user: &UserDto) {
        self.publish(USER_UPDATED, user_payload(user)).await;
    }

    pub async fn user_deleted(&self, id: Uuid) {
        self.publish(USER_DELETED, json!({ "id": id })).await;
    }

    async fn publish(&self, subject: &str, payload: Value) {
        if let Err(e) = self.bus.publish(subject, payload).await {
            warn!(subject, error = %e, "Event publish failed");
        }
    }
}

fn user_payload(user: &UserDto) -> Value {
    serde_json::to_value(user).unwrap_or_else(|e| {
        warn!(error = %e, "Event payload serialization failed");
        json!({ "id": user.id })
    })
}
