//! Shared application state passed to all request handlers.

use std::sync::Arc;

use domain_users::InMemoryUserRepository;
use mediator::Mediator;
use services::{InMemoryCache, InMemoryMessageBus};

use crate::events::EventPublisher;

/// Cloned per handler; every field is an Arc or a small value, so clones are
/// cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Request dispatcher with the full behavior pipeline applied
    pub mediator: Arc<Mediator>,
    /// Concrete repository handle, kept for readiness checks
    pub repository: Arc<InMemoryUserRepository>,
    /// Concrete cache handle, kept for readiness checks
    pub cache: Arc<InMemoryCache>,
    /// Concrete message bus handle, kept for readiness checks
    pub message_bus: Arc<InMemoryMessageBus>,
    /// Domain event publisher wrapping the message bus
    pub events: EventPublisher,
}
