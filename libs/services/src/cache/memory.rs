use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{CacheResult, CacheService};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory implementation of [`CacheService`] (for development/testing).
///
/// Expired entries are dropped lazily: on read of the expired key, and in a
/// sweep piggybacked on every write. Deadlines use `tokio::time::Instant` so
/// TTL behavior is testable with `tokio::time::pause`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of live (unexpired) entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Readiness probe: a set/get round trip through the store
    pub async fn health_check(&self) -> CacheResult<()> {
        let probe_key = "health:probe";
        let probe = Value::String("ok".to_string());

        self.set(probe_key, probe.clone(), Duration::from_secs(1))
            .await?;
        match self.get(probe_key).await? {
            Some(value) if value == probe => Ok(()),
            _ => Err(super::CacheError::Backend(
                "health probe round trip failed".to_string(),
            )),
        }
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let now = Instant::now();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {} // expired, fall through to remove
                None => return Ok(None),
            }
        }

        // Drop the expired entry; another writer may have refreshed the key
        // in between, so re-check the deadline under the write lock.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.is_expired(now) {
                entries.remove(key);
            } else {
                return Ok(Some(entry.value.clone()));
            }
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let cache = InMemoryCache::new();

        cache
            .set("users:1", json!({"name": "John"}), Duration::from_secs(30))
            .await
            .unwrap();

        let value = cache.get("users:1").await.unwrap();
        assert_eq!(value, Some(json!({"name": "John"})));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces_previous_value() {
        let cache = InMemoryCache::new();

        cache
            .set("k", json!(1), Duration::from_secs(30))
            .await
            .unwrap();
        cache
            .set("k", json!(2), Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(json!(2)));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = InMemoryCache::new();

        cache
            .set("k", json!("v"), Duration::from_secs(30))
            .await
            .unwrap();
        assert!(cache.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(31)).await;

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_sweeps_expired_entries() {
        let cache = InMemoryCache::new();

        cache
            .set("old", json!("v"), Duration::from_secs(1))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        cache
            .set("new", json!("v"), Duration::from_secs(30))
            .await
            .unwrap();

        let entries = cache.entries.read().await;
        assert!(!entries.contains_key("old"));
        assert!(entries.contains_key("new"));
    }

    #[tokio::test]
    async fn test_remove_is_noop_for_missing_key() {
        let cache = InMemoryCache::new();
        cache.remove("absent").await.unwrap();
    }

    #[tokio::test]
    async fn test_health_check_passes() {
        let cache = InMemoryCache::new();
        assert!(cache.health_check().await.is_ok());
    }
}
