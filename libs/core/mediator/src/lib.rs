//! Request Mediator
//!
//! Command/query dispatch with a fixed cross-cutting pipeline around every
//! handler invocation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Logging    │  ← duration + outcome per request type
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ Validation  │  ← declarative rule sets, failures accumulated
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │  Caching    │  ← queries only; hit short-circuits the rest
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ Resiliency  │  ← bounded retry with backoff, transient errors only
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │  Handler    │  ← terminal business logic
//! └─────────────┘
//! ```
//!
//! Request types implement [`Request`] (commands) or additionally [`Query`]
//! (cacheable reads). Handlers are registered once at startup on a
//! [`Mediator`]; dispatch is a `TypeId` map lookup, not per-call reflection.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mediator = Mediator::builder()
//!     .cache(cache, Duration::from_secs(30))
//!     .command::<CreateUser, _>(CreateUserHandler::new(repo.clone()))
//!     .query::<GetUserById, _>(GetUserByIdHandler::new(repo.clone()))
//!     .build();
//!
//! let dto = mediator.send(CreateUser { /* ... */ }).await?;
//! ```

pub mod behaviors;
pub mod error;
pub mod pipeline;
pub mod request;

pub use behaviors::{
    CachingBehavior, LoggingBehavior, ResiliencyBehavior, RetryConfig, ValidationBehavior,
};
pub use error::{FieldError, RequestError, collect_failures};
pub use pipeline::{Mediator, MediatorBuilder, Next, Pipeline, PipelineBehavior};
pub use request::{Query, Request, RequestHandler};

// The cancellation signal threaded through every stage
pub use tokio_util::sync::CancellationToken;
