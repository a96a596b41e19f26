//! Readiness check against the catalog document.

use crate::state::AppState;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness check endpoint that reads the catalog document.
///
/// Liveness (`/health`) comes from `axum_helpers::health_router`; this one
/// fails with 503 while the repository is unreachable or the document is
/// missing.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "document",
        Box::pin(async {
            state
                .documents
                .read()
                .await
                .map(|_| ())
                .map_err(|e| format!("Catalog read failed: {}", e))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(state)
}
