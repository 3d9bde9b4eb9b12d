use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::pipeline::{Next, PipelineBehavior};
use crate::request::{Query, Request};
use services::cache::CacheService;

/// Response cache for read-only requests.
///
/// The cache key is the request name plus a stable serialization of its
/// fields. A hit returns the cached response immediately, skipping the
/// resiliency stage and the handler; a miss proceeds and stores the fresh
/// response with the configured TTL. Cached values are independent JSON
/// copies, never live entities.
///
/// Cache backend failures degrade to a miss: the request still succeeds
/// against the handler, and the failure is only logged.
///
/// Writes never pass through this stage, and there is no write-driven
/// invalidation: a cached read can be stale for up to the TTL after a
/// mutation. The TTL bounds that staleness window.
pub struct CachingBehavior {
    cache: Arc<dyn CacheService>,
    ttl: Duration,
}

impl CachingBehavior {
    pub fn new(cache: Arc<dyn CacheService>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }
}

#[async_trait]
impl<R> PipelineBehavior<R> for CachingBehavior
where
    R: Query,
    R::Response: Serialize + DeserializeOwned,
{
    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> Result<R::Response, R::Error> {
        if cancel.is_cancelled() {
            return Err(R::Error::cancelled());
        }

        let key = request.cache_key();

        match self.cache.get(&key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(response) => {
                    debug!(request = R::NAME, "Cache hit");
                    return Ok(response);
                }
                Err(e) => {
                    // Stale schema from a previous build; drop and refresh
                    warn!(request = R::NAME, error = %e, "Discarding undecodable cache entry");
                    if let Err(e) = self.cache.remove(&key).await {
                        warn!(request = R::NAME, error = %e, "Cache remove failed");
                    }
                }
            },
            Ok(None) => {
                debug!(request = R::NAME, "Cache miss");
            }
            Err(e) => {
                warn!(request = R::NAME, error = %e, "Cache read failed, treating as miss");
            }
        }

        let response = next.run(request).await?;

        match serde_json::to_value(&response) {
            Ok(value) => {
                if let Err(e) = self.cache.set(&key, value, self.ttl).await {
                    warn!(request = R::NAME, error = %e, "Cache store failed");
                }
            }
            Err(e) => {
                warn!(request = R::NAME, error = %e, "Response not cacheable");
            }
        }

        Ok(response)
    }
}
