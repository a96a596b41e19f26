//! Catalog API - REST server over a GitHub-backed product document

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        repository = %config.github.full_name(),
        branch = %config.github.branch,
        document = %config.github.document_path,
        "Using GitHub-backed catalog"
    );

    let state = AppState::from_config(config)?;

    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!("Starting Catalog API on port {}", state.config.server.port);

    create_production_app(app, &state.config.server, Duration::from_secs(30), async {
        info!("Shutting down: no connections to drain");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
