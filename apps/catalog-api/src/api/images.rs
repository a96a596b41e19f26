//! Image upload routes

use axum::Router;
use domain_products::handlers;

use crate::state::AppState;

/// Create image upload router, limited to `UPLOAD_MAX_BYTES`
pub fn router(state: &AppState) -> Router {
    handlers::images_router(state.images.clone(), state.config.upload_max_bytes)
}
