use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::AppInfo;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// A boxed readiness probe; the error string is logged, never returned.
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Run readiness probes concurrently.
///
/// Responds 200 with `{"status":"ready", "<name>":"ok", ...}` when every probe
/// passes, otherwise 503 with the failing probes marked `"unavailable"`.
///
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture)> = vec![
///     ("document", Box::pin(async move {
///         documents.read().await.map(|_| ()).map_err(|e| e.to_string())
///     })),
/// ];
/// run_health_checks(checks).await
/// ```
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let results = join_all(checks.into_iter().map(|(_, check)| check)).await;

    let mut all_healthy = true;
    let mut body = Map::new();

    for (name, result) in names.into_iter().zip(results) {
        let status = match result {
            Ok(()) => "ok",
            Err(e) => {
                tracing::error!("Readiness check failed: {} error: {}", name, e);
                all_healthy = false;
                "unavailable"
            }
        };
        body.insert(name.to_string(), json!(status));
    }

    body.insert(
        "status".to_string(),
        json!(if all_healthy { "ready" } else { "not ready" }),
    );

    if all_healthy {
        Ok((StatusCode::OK, Json(Value::Object(body))))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(Value::Object(body))))
    }
}

/// Liveness handler; always 200 while the process is serving.
pub async fn health_handler(State(app): State<AppInfo>) -> Response {
    let response = HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Router exposing `GET /health` for `app_info`.
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}
