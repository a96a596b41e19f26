//! Admin authentication.
//!
//! The catalog has a single administrator identified by a configured
//! credential pair. A successful login yields a short-lived HS256 JWT whose
//! claims become the request's session context.
//!
//! ```ignore
//! use axum_helpers::auth::{AdminAuth, AdminConfig, admin_write_guard};
//! use core_config::FromEnv;
//!
//! let auth = AdminAuth::new(&AdminConfig::from_env()?);
//!
//! // Reads stay public, everything else needs a bearer token.
//! let routes = Router::new()
//!     .nest("/products", products)
//!     .layer(axum::middleware::from_fn_with_state(auth, admin_write_guard));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::AdminConfig;
pub use jwt::{AdminAuth, IssuedToken, SessionClaims};
pub use middleware::{AdminSession, admin_write_guard, require_admin};
