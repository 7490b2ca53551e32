//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod reservation;
pub mod serve;
pub mod user;
pub mod venue;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use tablebook_admission::BookingStore;
use tablebook_core::config::AppConfig;
use tablebook_core::error::AppError;
use tablebook_database::{DatabasePool, PgBookingStore};

use crate::output::OutputFormat;

/// TableBook: reservation admission for restaurants and hotels
#[derive(Debug, Parser)]
#[command(name = "tablebook", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the TableBook server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Admin account management
    Admin(admin::AdminArgs),
    /// User account listing
    User(user::UserArgs),
    /// Venue listing
    Venue(venue::VenueArgs),
    /// Reservation listing and statistics
    Reservation(reservation::ReservationArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Admin(args) => admin::execute(args, &config, self.format).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Venue(args) => venue::execute(args, &config, self.format).await,
            Commands::Reservation(args) => {
                reservation::execute(args, &config, self.format).await
            }
        }
    }
}

/// Helper: connect to the configured PostgreSQL database
pub async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: a booking store over the database
pub fn booking_store(db: &DatabasePool) -> Arc<dyn BookingStore> {
    Arc::new(PgBookingStore::new(db.pool().clone()))
}
