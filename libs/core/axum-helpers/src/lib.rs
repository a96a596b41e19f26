//! # Axum Helpers
//!
//! Shared building blocks for the catalog HTTP services.
//!
//! ## Modules
//!
//! - **[`auth`]**: single-admin login with HS256 session tokens
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: validated JSON and numeric id extractors
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::default();
//!     let router = create_router::<ApiDoc>(Router::new(), &config)?;
//!     create_production_app(router, &config, std::time::Duration::from_secs(30), async {}).await
//! }
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod server;

pub use auth::{AdminAuth, AdminConfig, AdminSession, IssuedToken, SessionClaims, admin_write_guard, require_admin};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, cors_layer, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};
