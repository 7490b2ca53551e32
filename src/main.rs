//! TableBook Server: reservation admission for restaurants and hotels.
//!
//! Main entry point that loads configuration, initializes logging, wires
//! the configured store backend, and starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use tablebook_core::config::{AppConfig, LoggingConfig};
use tablebook_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, source = ?e.source, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay, and variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("TABLEBOOK_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("TABLEBOOK_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.database.backend,
        "Starting TableBook"
    );

    let state = tablebook_api::app::build_state(config).await?;
    tablebook_api::run_server(state).await
}
