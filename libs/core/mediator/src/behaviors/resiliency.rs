use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::pipeline::{Next, PipelineBehavior};
use crate::request::Request;

/// Retry policy for the resiliency stage
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Initial delay between attempts in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum delay between attempts in milliseconds
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (typically 2.0)
    pub backoff_multiplier: f64,

    /// Whether to add jitter to prevent thundering herd
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Create a new retry configuration with defaults
    ///
    /// Defaults:
    /// - max_attempts: 3
    /// - initial_delay_ms: 100
    /// - max_delay_ms: 5000
    /// - backoff_multiplier: 2.0
    /// - use_jitter: true
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Innermost stage before the handler: bounded retry with exponential
/// backoff.
///
/// Only errors classified transient by [`RequestError::is_transient`] are
/// retried. Business failures (validation, missing entities, conflicts)
/// are never transient and propagate on the first attempt. After the attempt
/// budget is spent, the last error propagates unchanged.
///
/// Backoff sleeps race the cancellation signal, so a cancelled request stops
/// waiting immediately.
pub struct ResiliencyBehavior {
    config: RetryConfig,
}

impl ResiliencyBehavior {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for ResiliencyBehavior {
    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> Result<R::Response, R::Error> {
        if cancel.is_cancelled() {
            return Err(R::Error::cancelled());
        }

        let mut attempt = 1u32;
        let mut delay = self.config.initial_delay_ms;

        loop {
            match next.run(request).await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!(request = R::NAME, attempt, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    let current_delay = if self.config.use_jitter {
                        apply_jitter(delay)
                    } else {
                        delay
                    };

                    debug!(
                        request = R::NAME,
                        attempt,
                        max_attempts = self.config.max_attempts,
                        delay_ms = current_delay,
                        error = %e,
                        "Transient failure, retrying"
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(R::Error::cancelled()),
                        _ = tokio::time::sleep(Duration::from_millis(current_delay)) => {}
                    }

                    delay = ((delay as f64 * self.config.backoff_multiplier) as u64)
                        .min(self.config.max_delay_ms);
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        warn!(
                            request = R::NAME,
                            attempts = attempt,
                            error = %e,
                            "Giving up after transient failures"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

/// Apply jitter to a delay value to prevent thundering herd
///
/// Uses a pseudo-random value between 50% and 100% of the original delay
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * random_factor) as u64
}
