//! In-process service collaborators: cache, message bus, secrets.
//!
//! Each module exposes a trait contract plus an in-memory implementation
//! suitable for development and testing. Production backends (Redis, NATS,
//! Vault, ...) would implement the same traits without touching callers.

pub mod cache;
pub mod messaging;
pub mod secrets;

pub use cache::{CacheConfig, CacheError, CacheService, InMemoryCache};
pub use messaging::{InMemoryMessageBus, Message, MessageBus, MessagingError};
pub use secrets::{
    ChainSecretProvider, EnvSecretProvider, InMemorySecretProvider, SecretError, SecretProvider,
};
