use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::behaviors::{
    CachingBehavior, LoggingBehavior, ResiliencyBehavior, RetryConfig, ValidationBehavior,
};
use crate::error::RequestError;
use crate::request::{Query, Request, RequestHandler};
use services::cache::CacheService;

/// A cross-cutting stage wrapped around every handler invocation.
///
/// Behaviors receive the request, the cancellation signal, and a [`Next`]
/// cursor to the remaining chain. A behavior may short-circuit (validation
/// rejection, cache hit) or invoke `next` one or more times (retry).
#[async_trait]
pub trait PipelineBehavior<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> Result<R::Response, R::Error>;
}

/// Cursor over the remaining pipeline stages.
///
/// `Next` is `Copy`, so a behavior may run the tail of the chain more than
/// once (the resiliency stage does exactly that).
pub struct Next<'a, R: Request> {
    behaviors: &'a [Arc<dyn PipelineBehavior<R>>],
    handler: &'a dyn RequestHandler<R>,
    cancel: &'a CancellationToken,
}

impl<R: Request> Clone for Next<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Request> Copy for Next<'_, R> {}

impl<R: Request> Next<'_, R> {
    /// Run the remaining stages in order, ending at the terminal handler.
    pub async fn run(self, request: &R) -> Result<R::Response, R::Error> {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                let next = Next {
                    behaviors: rest,
                    handler: self.handler,
                    cancel: self.cancel,
                };
                behavior.handle(request, self.cancel, next).await
            }
            None => self.handler.handle(request, self.cancel).await,
        }
    }
}

/// An assembled behavior chain plus terminal handler for one request type.
pub struct Pipeline<R: Request> {
    behaviors: Vec<Arc<dyn PipelineBehavior<R>>>,
    handler: Arc<dyn RequestHandler<R>>,
}

impl<R: Request> Pipeline<R> {
    pub fn new(
        behaviors: Vec<Arc<dyn PipelineBehavior<R>>>,
        handler: Arc<dyn RequestHandler<R>>,
    ) -> Self {
        Self { behaviors, handler }
    }

    pub async fn send(
        &self,
        request: &R,
        cancel: &CancellationToken,
    ) -> Result<R::Response, R::Error> {
        let next = Next {
            behaviors: &self.behaviors,
            handler: self.handler.as_ref(),
            cancel,
        };
        next.run(request).await
    }
}

/// Request dispatcher: a static registry of per-type pipelines.
///
/// Pipelines are assembled once at startup by [`MediatorBuilder`]; dispatch
/// resolves the pipeline with a `TypeId` lookup and runs the chain
/// Logging → Validation → Caching (queries) → Resiliency → Handler.
pub struct Mediator {
    pipelines: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    /// Dispatch a request with a fresh (never-fired) cancellation signal.
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, R::Error> {
        self.send_with_cancellation(request, &CancellationToken::new())
            .await
    }

    /// Dispatch a request, threading the given cancellation signal through
    /// every stage and down to the handler.
    pub async fn send_with_cancellation<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<R::Response, R::Error> {
        let pipeline = self
            .pipelines
            .get(&TypeId::of::<R>())
            .and_then(|p| p.downcast_ref::<Pipeline<R>>())
            .ok_or_else(|| R::Error::unhandled(R::NAME))?;

        pipeline.send(&request, cancel).await
    }

    /// Number of registered request types
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

/// Builds a [`Mediator`], assembling the behavior chain for each registered
/// request type at startup.
pub struct MediatorBuilder {
    pipelines: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    retry: RetryConfig,
    cache: Option<(Arc<dyn CacheService>, Duration)>,
}

impl MediatorBuilder {
    fn new() -> Self {
        Self {
            pipelines: HashMap::new(),
            retry: RetryConfig::default(),
            cache: None,
        }
    }

    /// Override the retry policy applied by the resiliency stage.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Enable response caching for queries registered after this call.
    pub fn cache(mut self, cache: Arc<dyn CacheService>, ttl: Duration) -> Self {
        self.cache = Some((cache, ttl));
        self
    }

    /// Register a state-changing command: Logging → Validation → Resiliency
    /// → Handler.
    pub fn command<R, H>(mut self, handler: H) -> Self
    where
        R: Request + Validate,
        H: RequestHandler<R> + 'static,
    {
        let behaviors: Vec<Arc<dyn PipelineBehavior<R>>> = vec![
            Arc::new(LoggingBehavior::new()),
            Arc::new(ValidationBehavior::new()),
            Arc::new(ResiliencyBehavior::new(self.retry.clone())),
        ];

        self.pipelines.insert(
            TypeId::of::<R>(),
            Box::new(Pipeline::new(behaviors, Arc::new(handler))),
        );
        self
    }

    /// Register a read-only query: Logging → Validation → Caching →
    /// Resiliency → Handler. The caching stage is omitted when no cache
    /// service is configured.
    pub fn query<R, H>(mut self, handler: H) -> Self
    where
        R: Query + Validate,
        R::Response: Serialize + DeserializeOwned,
        H: RequestHandler<R> + 'static,
    {
        let mut behaviors: Vec<Arc<dyn PipelineBehavior<R>>> = vec![
            Arc::new(LoggingBehavior::new()),
            Arc::new(ValidationBehavior::new()),
        ];

        if let Some((cache, ttl)) = &self.cache {
            behaviors.push(Arc::new(CachingBehavior::new(cache.clone(), *ttl)));
        }
        behaviors.push(Arc::new(ResiliencyBehavior::new(self.retry.clone())));

        self.pipelines.insert(
            TypeId::of::<R>(),
            Box::new(Pipeline::new(behaviors, Arc::new(handler))),
        );
        self
    }

    pub fn build(self) -> Mediator {
        Mediator {
            pipelines: self.pipelines,
        }
    }
}
