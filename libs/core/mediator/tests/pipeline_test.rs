//! Pipeline behavior tests
//!
//! These tests drive a full mediator (all four behaviors plus terminal
//! handlers) with stub request types, verifying:
//! - dispatch and registry semantics
//! - validation accumulation and short-circuiting
//! - query caching (hit, TTL expiry, write bypass)
//! - retry classification (transient vs business errors)
//! - cancellation short-circuiting

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mediator::{
    CancellationToken, FieldError, Mediator, Query, Request, RequestError, RequestHandler,
    RetryConfig,
};
use serde::Serialize;
use serde_json::Value;
use services::cache::{CacheError, CacheResult, CacheService, InMemoryCache};
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error)]
enum WidgetError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("widget {0} not found")]
    NotFound(u32),

    #[error("store temporarily unavailable")]
    Unavailable,

    #[error("request cancelled")]
    Cancelled,

    #[error("no handler registered for '{0}'")]
    Unhandled(&'static str),
}

impl RequestError for WidgetError {
    fn validation(failures: Vec<FieldError>) -> Self {
        WidgetError::Validation(failures)
    }

    fn cancelled() -> Self {
        WidgetError::Cancelled
    }

    fn unhandled(request_name: &'static str) -> Self {
        WidgetError::Unhandled(request_name)
    }

    fn is_transient(&self) -> bool {
        matches!(self, WidgetError::Unavailable)
    }
}

#[derive(Debug, Validate)]
struct RenameWidget {
    id: u32,
    #[validate(length(min = 1, message = "must not be empty"))]
    name: String,
    #[validate(email(message = "must be a valid email address"))]
    owner_email: String,
}

impl Request for RenameWidget {
    type Response = String;
    type Error = WidgetError;

    const NAME: &'static str = "widgets.rename";
}

#[derive(Debug, Serialize, Validate)]
struct GetWidget {
    #[validate(range(min = 1, message = "must be positive"))]
    id: u32,
}

impl Request for GetWidget {
    type Response = Option<String>;
    type Error = WidgetError;

    const NAME: &'static str = "widgets.get";
}

impl Query for GetWidget {}

/// Counts invocations and renames unconditionally
struct RenameHandler {
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl RequestHandler<RenameWidget> for RenameHandler {
    async fn handle(
        &self,
        request: &RenameWidget,
        _cancel: &CancellationToken,
    ) -> Result<String, WidgetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("widget-{}:{}", request.id, request.name))
    }
}

/// Counts invocations and always finds the widget
struct GetHandler {
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl RequestHandler<GetWidget> for GetHandler {
    async fn handle(
        &self,
        request: &GetWidget,
        _cancel: &CancellationToken,
    ) -> Result<Option<String>, WidgetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(format!("widget-{}", request.id)))
    }
}

/// Fails with a transient error for the first `failures` invocations
struct FlakyHandler {
    calls: Arc<AtomicU32>,
    failures: u32,
}

#[async_trait]
impl RequestHandler<RenameWidget> for FlakyHandler {
    async fn handle(
        &self,
        request: &RenameWidget,
        _cancel: &CancellationToken,
    ) -> Result<String, WidgetError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            Err(WidgetError::Unavailable)
        } else {
            Ok(request.name.clone())
        }
    }
}

/// Always reports the widget missing
struct MissingHandler {
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl RequestHandler<RenameWidget> for MissingHandler {
    async fn handle(
        &self,
        request: &RenameWidget,
        _cancel: &CancellationToken,
    ) -> Result<String, WidgetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(WidgetError::NotFound(request.id))
    }
}

/// Cache whose reads and/or writes fail with a backend error
#[derive(Default)]
struct FaultyCache {
    fail_get: bool,
    fail_set: bool,
}

#[async_trait]
impl CacheService for FaultyCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<Value>> {
        if self.fail_get {
            Err(CacheError::Backend("connection refused".to_string()))
        } else {
            Ok(None)
        }
    }

    async fn set(&self, _key: &str, _value: Value, _ttl: Duration) -> CacheResult<()> {
        if self.fail_set {
            Err(CacheError::Backend("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    async fn remove(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }
}

fn fast_retry() -> RetryConfig {
    RetryConfig::new().with_initial_delay(1).without_jitter()
}

fn valid_rename(name: &str) -> RenameWidget {
    RenameWidget {
        id: 1,
        name: name.to_string(),
        owner_email: "owner@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_dispatch_returns_handler_result() {
    let calls = Arc::new(AtomicU32::new(0));
    let mediator = Mediator::builder()
        .command::<RenameWidget, _>(RenameHandler {
            calls: calls.clone(),
        })
        .build();

    let result = mediator.send(valid_rename("gear")).await.unwrap();

    assert_eq!(result, "widget-1:gear");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unregistered_request_type_is_unhandled() {
    let mediator = Mediator::builder().build();

    let err = mediator.send(valid_rename("gear")).await.unwrap_err();

    assert!(matches!(err, WidgetError::Unhandled("widgets.rename")));
}

#[tokio::test]
async fn test_validation_accumulates_all_failures() {
    let calls = Arc::new(AtomicU32::new(0));
    let mediator = Mediator::builder()
        .command::<RenameWidget, _>(RenameHandler {
            calls: calls.clone(),
        })
        .build();

    let invalid = RenameWidget {
        id: 1,
        name: String::new(),
        owner_email: "not-an-email".to_string(),
    };

    let err = mediator.send(invalid).await.unwrap_err();

    match err {
        WidgetError::Validation(failures) => {
            assert_eq!(failures.len(), 2, "both rule violations reported");
            assert!(failures.iter().any(|f| f.field == "name"));
            assert!(failures.iter().any(|f| f.field == "owner_email"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    // The terminal handler never ran
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_query_is_cached_within_ttl() {
    let calls = Arc::new(AtomicU32::new(0));
    let cache = Arc::new(InMemoryCache::new());
    let mediator = Mediator::builder()
        .cache(cache, Duration::from_secs(30))
        .query::<GetWidget, _>(GetHandler {
            calls: calls.clone(),
        })
        .build();

    let first = mediator.send(GetWidget { id: 7 }).await.unwrap();
    let second = mediator.send(GetWidget { id: 7 }).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        calls.load(Ordering::SeqCst),
        1,
        "second call served from cache"
    );
}

#[tokio::test(start_paused = true)]
async fn test_cache_expires_after_ttl() {
    let calls = Arc::new(AtomicU32::new(0));
    let cache = Arc::new(InMemoryCache::new());
    let mediator = Mediator::builder()
        .cache(cache, Duration::from_secs(30))
        .query::<GetWidget, _>(GetHandler {
            calls: calls.clone(),
        })
        .build();

    mediator.send(GetWidget { id: 7 }).await.unwrap();
    tokio::time::advance(Duration::from_secs(31)).await;
    mediator.send(GetWidget { id: 7 }).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2, "expired entry is refreshed");
}

#[tokio::test(start_paused = true)]
async fn test_distinct_query_parameters_do_not_share_cache_entries() {
    let calls = Arc::new(AtomicU32::new(0));
    let cache = Arc::new(InMemoryCache::new());
    let mediator = Mediator::builder()
        .cache(cache, Duration::from_secs(30))
        .query::<GetWidget, _>(GetHandler {
            calls: calls.clone(),
        })
        .build();

    let seven = mediator.send(GetWidget { id: 7 }).await.unwrap();
    let eight = mediator.send(GetWidget { id: 8 }).await.unwrap();

    assert_ne!(seven, eight);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_commands_bypass_caching() {
    let calls = Arc::new(AtomicU32::new(0));
    let cache = Arc::new(InMemoryCache::new());
    let mediator = Mediator::builder()
        .cache(cache.clone(), Duration::from_secs(30))
        .command::<RenameWidget, _>(RenameHandler {
            calls: calls.clone(),
        })
        .build();

    mediator.send(valid_rename("gear")).await.unwrap();
    mediator.send(valid_rename("gear")).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2, "every write reaches the handler");
    assert!(cache.is_empty().await, "writes never populate the cache");
}

#[tokio::test(start_paused = true)]
async fn test_invalid_query_never_reaches_cache_or_handler() {
    let calls = Arc::new(AtomicU32::new(0));
    let cache = Arc::new(InMemoryCache::new());
    let mediator = Mediator::builder()
        .cache(cache.clone(), Duration::from_secs(30))
        .query::<GetWidget, _>(GetHandler {
            calls: calls.clone(),
        })
        .build();

    let err = mediator.send(GetWidget { id: 0 }).await.unwrap_err();

    assert!(matches!(err, WidgetError::Validation(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(cache.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_retried_until_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let mediator = Mediator::builder()
        .retry_config(fast_retry())
        .command::<RenameWidget, _>(FlakyHandler {
            calls: calls.clone(),
            failures: 2,
        })
        .build();

    let result = mediator.send(valid_rename("gear")).await.unwrap();

    assert_eq!(result, "gear");
    assert_eq!(calls.load(Ordering::SeqCst), 3, "two retries then success");
}

#[tokio::test(start_paused = true)]
async fn test_retries_exhausted_surfaces_last_error() {
    let calls = Arc::new(AtomicU32::new(0));
    let mediator = Mediator::builder()
        .retry_config(fast_retry())
        .command::<RenameWidget, _>(FlakyHandler {
            calls: calls.clone(),
            failures: 10,
        })
        .build();

    let err = mediator.send(valid_rename("gear")).await.unwrap_err();

    assert!(matches!(err, WidgetError::Unavailable));
    assert_eq!(calls.load(Ordering::SeqCst), 3, "attempt budget respected");
}

#[tokio::test]
async fn test_business_errors_are_not_retried() {
    let calls = Arc::new(AtomicU32::new(0));
    let mediator = Mediator::builder()
        .retry_config(fast_retry())
        .command::<RenameWidget, _>(MissingHandler {
            calls: calls.clone(),
        })
        .build();

    let err = mediator.send(valid_rename("gear")).await.unwrap_err();

    assert!(matches!(err, WidgetError::NotFound(1)));
    assert_eq!(calls.load(Ordering::SeqCst), 1, "not-found is never transient");
}

#[tokio::test(start_paused = true)]
async fn test_cache_read_failure_degrades_to_miss() {
    let calls = Arc::new(AtomicU32::new(0));
    let cache = Arc::new(FaultyCache {
        fail_get: true,
        fail_set: false,
    });
    let mediator = Mediator::builder()
        .cache(cache, Duration::from_secs(30))
        .query::<GetWidget, _>(GetHandler {
            calls: calls.clone(),
        })
        .build();

    let first = mediator.send(GetWidget { id: 7 }).await.unwrap();
    let second = mediator.send(GetWidget { id: 7 }).await.unwrap();

    assert_eq!(first, Some("widget-7".to_string()));
    assert_eq!(second, Some("widget-7".to_string()));
    assert_eq!(
        calls.load(Ordering::SeqCst),
        2,
        "unreadable cache means every query reaches the handler"
    );
}

#[tokio::test(start_paused = true)]
async fn test_cache_store_failure_does_not_fail_the_query() {
    let calls = Arc::new(AtomicU32::new(0));
    let cache = Arc::new(FaultyCache {
        fail_get: false,
        fail_set: true,
    });
    let mediator = Mediator::builder()
        .cache(cache, Duration::from_secs(30))
        .query::<GetWidget, _>(GetHandler {
            calls: calls.clone(),
        })
        .build();

    let first = mediator.send(GetWidget { id: 7 }).await.unwrap();
    let second = mediator.send(GetWidget { id: 7 }).await.unwrap();

    assert_eq!(first, Some("widget-7".to_string()));
    assert_eq!(second, Some("widget-7".to_string()));
    assert_eq!(
        calls.load(Ordering::SeqCst),
        2,
        "nothing was stored, so the second query is a miss"
    );
}

#[tokio::test]
async fn test_pre_cancelled_token_short_circuits() {
    let calls = Arc::new(AtomicU32::new(0));
    let mediator = Mediator::builder()
        .command::<RenameWidget, _>(RenameHandler {
            calls: calls.clone(),
        })
        .build();

    let token = CancellationToken::new();
    token.cancel();

    let err = mediator
        .send_with_cancellation(valid_rename("gear"), &token)
        .await
        .unwrap_err();

    assert!(matches!(err, WidgetError::Cancelled));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_during_backoff_stops_retrying() {
    let calls = Arc::new(AtomicU32::new(0));
    let mediator = Mediator::builder()
        .retry_config(
            RetryConfig::new()
                .with_initial_delay(10_000)
                .without_jitter(),
        )
        .command::<RenameWidget, _>(FlakyHandler {
            calls: calls.clone(),
            failures: 10,
        })
        .build();

    let token = CancellationToken::new();

    // The first attempt fails and the pipeline starts a 10s backoff sleep;
    // the token fires 20ms in, long before the sleep would elapse.
    let (result, _) = tokio::join!(
        mediator.send_with_cancellation(valid_rename("gear"), &token),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        }
    );

    assert!(matches!(result.unwrap_err(), WidgetError::Cancelled));
    assert_eq!(
        calls.load(Ordering::SeqCst),
        1,
        "no further attempt after cancellation"
    );
}

#[tokio::test]
async fn test_registry_size() {
    let mediator = Mediator::builder()
        .command::<RenameWidget, _>(RenameHandler {
            calls: Arc::new(AtomicU32::new(0)),
        })
        .query::<GetWidget, _>(GetHandler {
            calls: Arc::new(AtomicU32::new(0)),
        })
        .build();

    assert_eq!(mediator.len(), 2);
    assert!(!mediator.is_empty());
}
