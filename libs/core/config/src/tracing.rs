use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Default filter when `RUST_LOG` is unset. Outbound GitHub traffic is
/// logged at debug by the domain crate, so development keeps it visible.
const DEV_FILTER: &str = "debug,hyper=info,reqwest=info,h2=info,tower_http=debug";
const PROD_FILTER: &str = "info,tower_http=info";

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations. Safe to call
/// multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with environment-aware output and error span capture.
///
/// - **Production** (`APP_ENV=production`): flattened JSON events, no targets.
/// - **Development** (default): pretty, human-readable output.
///
/// Both install `tracing_error::ErrorLayer` so color-eyre reports carry span
/// traces. `RUST_LOG` overrides the default filter.
///
/// Safe to call more than once; later calls are no-ops (common in tests).
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if environment.is_production() {
            PROD_FILTER
        } else {
            DEV_FILTER
        })
    });

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
