use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::RequestError;
use crate::pipeline::{Next, PipelineBehavior};
use crate::request::Request;

/// Outermost stage: records start, elapsed duration and outcome of every
/// request. Never alters the result; errors are re-raised after logging.
#[derive(Debug, Default, Clone)]
pub struct LoggingBehavior;

impl LoggingBehavior {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for LoggingBehavior {
    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> Result<R::Response, R::Error> {
        if cancel.is_cancelled() {
            return Err(R::Error::cancelled());
        }

        debug!(request = R::NAME, "Handling request");
        let started = Instant::now();

        let result = next.run(request).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                info!(request = R::NAME, elapsed_ms, "Request completed");
            }
            Err(e) => {
                warn!(request = R::NAME, elapsed_ms, error = %e, "Request failed");
            }
        }

        result
    }
}
