use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Build a CORS layer for the configured origins.
///
/// Returns `Ok(None)` when no origins are configured.
///
/// # Errors
/// Returns `InvalidInput` if an origin is not a valid header value.
pub fn cors_layer(origins: &[String]) -> io::Result<Option<CorsLayer>> {
    if origins.is_empty() {
        return Ok(None);
    }

    let allowed = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    info!("CORS configured with allowed origins: {}", origins.join(","));

    Ok(Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
                header::COOKIE,
            ])
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600)),
    ))
}

/// Assemble the application router.
///
/// - API routes nested under `/api` (state already applied by the caller)
/// - Swagger UI, ReDoc, RapiDoc and Scalar for `T`
/// - request tracing, compression and (optionally) CORS
/// - JSON 404 fallback
///
/// Health endpoints are merged by the app with [`super::health_router`].
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new());

    Ok(match cors_layer(&server_config.cors_allowed_origins)? {
        Some(cors) => router.layer(cors),
        None => router,
    })
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup` bounded by
/// `shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_coordinator = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        cleanup_coordinator.notified().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let signal_coordinator = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal_coordinator.wait_for_signal().await })
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    // Serve may also end on error; make sure cleanup still runs.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    #[test]
    fn test_cors_layer_none_without_origins() {
        assert!(cors_layer(&[]).unwrap().is_none());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let err = cors_layer(&["http://bad\norigin".to_string()]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_create_router_nests_api_and_falls_back() {
        let apis = Router::new().route("/ping", get(|| async { "pong" }));
        let router = create_router::<TestDoc>(apis, &ServerConfig::default()).unwrap();

        let response = router
            .clone()
            .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
