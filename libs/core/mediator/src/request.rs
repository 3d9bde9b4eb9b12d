use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::RequestError;

/// A dispatchable request: a command or query together with its response and
/// error types.
///
/// `NAME` identifies the request type in logs and cache keys; the convention
/// is `domain.operation` (e.g. `users.create`).
pub trait Request: Send + Sync + 'static {
    type Response: Clone + Send + Sync + 'static;
    type Error: RequestError;

    const NAME: &'static str;
}

/// Marker for read-only requests whose responses may be cached.
///
/// Commands must not implement this; the caching stage only ever sees request
/// types registered through [`MediatorBuilder::query`](crate::MediatorBuilder::query).
pub trait Query: Request + Serialize {
    /// Deterministic cache key: request name plus a stable serialization of
    /// the request's fields.
    fn cache_key(&self) -> String {
        match serde_json::to_string(self) {
            Ok(fields) => format!("{}:{}", Self::NAME, fields),
            // Plain-data queries cannot fail to serialize; degrade to a
            // shared per-type key rather than panic if one somehow does.
            Err(_) => Self::NAME.to_string(),
        }
    }
}

/// Terminal stage of the pipeline: executes one request's business logic.
///
/// Handlers are orchestration units: they consult the repository, enforce a
/// business rule, and return a DTO or a typed error. The cancellation token
/// is honored at entry; handlers never leave partial state behind on
/// cancellation.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationToken,
    ) -> Result<R::Response, R::Error>;
}
