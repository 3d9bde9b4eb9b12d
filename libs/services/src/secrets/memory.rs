use async_trait::async_trait;
use std::collections::HashMap;

use super::{SecretError, SecretProvider, SecretResult};

/// Secret source backed by a fixed map (for development/testing).
#[derive(Debug, Default, Clone)]
pub struct InMemorySecretProvider {
    secrets: HashMap<String, String>,
}

impl InMemorySecretProvider {
    pub fn new() -> Self {
        Self {
            secrets: HashMap::new(),
        }
    }

    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretProvider for InMemorySecretProvider {
    async fn get_secret(&self, name: &str) -> SecretResult<String> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }

    fn source_name(&self) -> &'static str {
        "in-memory"
    }
}
