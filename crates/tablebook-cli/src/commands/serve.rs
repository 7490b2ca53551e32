//! Start the TableBook server.

use clap::Args;

use tablebook_core::config::{AppConfig, StoreBackend};
use tablebook_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Use the in-memory store instead of PostgreSQL
    #[arg(long)]
    pub memory: bool,

    /// Skip database migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.memory {
        config.database.backend = StoreBackend::Memory;
    }
    if args.no_migrate {
        config.database.run_migrations = false;
    }

    println!("Starting TableBook server...");
    println!("  Host:    {}", config.server.host);
    println!("  Port:    {}", config.server.port);
    println!("  Backend: {:?}", config.database.backend);

    let state = tablebook_api::app::build_state(config).await?;
    tablebook_api::run_server(state).await
}
