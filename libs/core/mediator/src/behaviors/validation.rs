use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use validator::Validate;

use crate::error::{RequestError, collect_failures};
use crate::pipeline::{Next, PipelineBehavior};
use crate::request::Request;

/// Runs the request's declarative rule set before any later stage.
///
/// All failing rules are accumulated into a single validation error: a
/// request violating several independent rules reports every violation at
/// once. A request type with no rules passes through unchanged. On
/// rejection, caching, resiliency and the handler never execute.
#[derive(Debug, Default, Clone)]
pub struct ValidationBehavior;

impl ValidationBehavior {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<R> PipelineBehavior<R> for ValidationBehavior
where
    R: Request + Validate,
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

        if let Err(errors) = request.validate() {
            let failures = collect_failures(&errors);
            debug!(
                request = R::NAME,
                failures = failures.len(),
                "Request rejected by validation"
            );
            return Err(R::Error::validation(failures));
        }

        next.run(request).await
    }
}
