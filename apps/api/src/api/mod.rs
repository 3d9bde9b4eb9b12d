use axum::Router;
use axum::routing::get;
use mediator::{CancellationToken, Mediator, Request, RequestError};
use std::sync::Arc;

pub mod health;
pub mod users;

/// Dispatch a request on its own task, tied to the caller's lifetime.
///
/// Axum drops a handler future when the client disconnects. The pipeline runs
/// on a spawned task so it is not torn down mid-stage; the drop guard fires
/// the cancellation token instead, and the pipeline stops at its next
/// cancellation check or backoff sleep.
pub(crate) async fn dispatch<R: Request>(
    mediator: &Arc<Mediator>,
    request: R,
) -> Result<R::Response, R::Error> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let mediator = mediator.clone();
    let task =
        tokio::spawn(async move { mediator.send_with_cancellation(request, &cancel).await });

    match task.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        // Runtime shutdown aborted the task
        Err(_) => Err(R::Error::cancelled()),
    }
}

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest("/users", users::router(state.clone()))
}

/// Creates a router with the `/ready` endpoint performing real dependency
/// checks. Merged on top of the app router so it stays outside `/api`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
