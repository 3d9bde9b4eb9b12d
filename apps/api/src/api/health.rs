use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

use crate::state::AppState;

/// Readiness probe: checks every backing collaborator concurrently.
///
/// Returns 200 with per-service status when all are reachable, 503 when any
/// is not.
pub async fn ready_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![
        (
            "store",
            Box::pin(async {
                state
                    .repository
                    .health_check()
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "cache",
            Box::pin(async { state.cache.health_check().await.map_err(|e| e.to_string()) }),
        ),
        (
            "messaging",
            Box::pin(async {
                state
                    .message_bus
                    .health_check()
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
    ];

    run_health_checks(checks).await
}
