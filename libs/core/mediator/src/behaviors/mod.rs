//! Pipeline stages, composed outermost-to-innermost as
//! Logging → Validation → Caching → Resiliency.

pub mod caching;
pub mod logging;
pub mod resiliency;
pub mod validation;

pub use caching::CachingBehavior;
pub use logging::LoggingBehavior;
pub use resiliency::{ResiliencyBehavior, RetryConfig};
pub use validation::ValidationBehavior;
