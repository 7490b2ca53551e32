//! Venue listing commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tablebook_admission::BookingStore;
use tablebook_core::config::AppConfig;
use tablebook_core::error::AppError;
use tablebook_core::types::pagination::PageRequest;

use crate::output::{self, OutputFormat};

/// Arguments for venue commands
#[derive(Debug, Args)]
pub struct VenueArgs {
    /// Venue subcommand
    #[command(subcommand)]
    pub command: VenueCommand,
}

/// Venue subcommands
#[derive(Debug, Subcommand)]
pub enum VenueCommand {
    /// List venues by name
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Page size
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct VenueRow {
    id: String,
    name: String,
    kind: String,
    hours: String,
    max_party: i32,
    seats: i32,
}

/// Execute venue commands
pub async fn execute(
    args: &VenueArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect(config).await?;
    let store = super::booking_store(&db);

    match &args.command {
        VenueCommand::List { page, limit } => {
            let result = store.list_venues(&PageRequest::new(*page, *limit)).await?;
            let rows: Vec<VenueRow> = result
                .items
                .iter()
                .map(|v| VenueRow {
                    id: v.id.to_string(),
                    name: v.name.clone(),
                    kind: format!("{:?}", v.kind).to_lowercase(),
                    hours: format!(
                        "{}-{}",
                        v.opens_at.format("%H:%M"),
                        v.closes_at.format("%H:%M")
                    ),
                    max_party: v.max_party_size,
                    seats: v.seat_capacity,
                })
                .collect();
            output::print_list(&rows, format);
            output::print_page_footer(
                result.page,
                result.total_pages,
                result.total_items,
                format,
            );
        }
    }

    db.close().await;
    Ok(())
}
