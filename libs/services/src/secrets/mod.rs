//! Secret provider contract with environment and in-memory sources.

pub mod env;
pub mod memory;

pub use env::EnvSecretProvider;
pub use memory::InMemorySecretProvider;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret '{0}' was not found in any configured source")]
    NotFound(String),

    #[error("Secret source error: {0}")]
    Source(String),
}

pub type SecretResult<T> = Result<T, SecretError>;

/// Named-secret lookup.
///
/// Secret names are dotted paths like `users.admin-email`; each source maps
/// them to its own storage scheme.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get_secret(&self, name: &str) -> SecretResult<String>;

    /// Short label for logging which source resolved or missed a secret
    fn source_name(&self) -> &'static str;
}

/// Consults a list of providers in order and returns the first hit.
///
/// Fails with [`SecretError::NotFound`] only when every source misses;
/// any other source error aborts the chain immediately.
pub struct ChainSecretProvider {
    sources: Vec<Arc<dyn SecretProvider>>,
}

impl ChainSecretProvider {
    pub fn new(sources: Vec<Arc<dyn SecretProvider>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl SecretProvider for ChainSecretProvider {
    async fn get_secret(&self, name: &str) -> SecretResult<String> {
        for source in &self.sources {
            match source.get_secret(name).await {
                Ok(value) => {
                    debug!(secret = %name, source = source.source_name(), "Secret resolved");
                    return Ok(value);
                }
                Err(SecretError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(SecretError::NotFound(name.to_string()))
    }

    fn source_name(&self) -> &'static str {
        "chain"
    }
}
