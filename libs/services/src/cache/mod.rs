//! Response cache contract and in-memory implementation.

pub mod memory;

pub use memory::InMemoryCache;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_parse_or};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache backend error: {0}")]
    Backend(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache with per-entry time-to-live.
///
/// Values are stored as JSON documents, decoupled from any live domain
/// entity; callers serialize/deserialize at the boundary.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Fetch a value; `None` on miss or expired entry
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Store a value, replacing any previous entry for the key
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> CacheResult<()>;

    /// Drop a value; no-op if the key is absent
    async fn remove(&self, key: &str) -> CacheResult<()>;
}

/// Cache configuration
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Time-to-live applied to cached query responses
    pub default_ttl: Duration,
}

impl CacheConfig {
    pub fn new(default_ttl: Duration) -> Self {
        Self { default_ttl }
    }
}

impl FromEnv for CacheConfig {
    /// Reads from environment variables with sensible defaults:
    /// - CACHE_TTL_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        let ttl_secs = env_parse_or("CACHE_TTL_SECS", 30u64)?;
        Ok(Self {
            default_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        temp_env::with_var_unset("CACHE_TTL_SECS", || {
            let config = CacheConfig::from_env().unwrap();
            assert_eq!(config.default_ttl, Duration::from_secs(30));
        });
    }

    #[test]
    fn test_cache_config_from_env() {
        temp_env::with_var("CACHE_TTL_SECS", Some("120"), || {
            let config = CacheConfig::from_env().unwrap();
            assert_eq!(config.default_ttl, Duration::from_secs(120));
        });
    }

    #[test]
    fn test_cache_config_invalid_ttl() {
        temp_env::with_var("CACHE_TTL_SECS", Some("soon"), || {
            assert!(CacheConfig::from_env().is_err());
        });
    }
}
