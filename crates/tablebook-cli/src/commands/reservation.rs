//! Reservation listing and statistics commands.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use tablebook_admission::BookingStore;
use tablebook_core::config::AppConfig;
use tablebook_core::error::AppError;
use tablebook_core::types::pagination::PageRequest;
use tablebook_entity::reservation::{ReservationFilter, ReservationStatus};

use crate::output::{self, OutputFormat};

/// Arguments for reservation commands
#[derive(Debug, Args)]
pub struct ReservationArgs {
    /// Reservation subcommand
    #[command(subcommand)]
    pub command: ReservationCommand,
}

/// Filter options shared by the reservation subcommands
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Only this venue
    #[arg(long)]
    pub venue: Option<Uuid>,
    /// Only this status (pending, approved, rejected, cancelled)
    #[arg(long)]
    pub status: Option<ReservationStatus>,
    /// Earliest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl From<&FilterArgs> for ReservationFilter {
    fn from(args: &FilterArgs) -> Self {
        Self {
            venue_id: args.venue,
            user_id: None,
            status: args.status,
            date_from: args.from,
            date_to: args.to,
        }
    }
}

/// Reservation subcommands
#[derive(Debug, Subcommand)]
pub enum ReservationCommand {
    /// List reservations, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Page size
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },
    /// Count reservations per status
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct ReservationRow {
    id: String,
    date: String,
    time: String,
    party: i32,
    customer: String,
    table: String,
    status: String,
}

/// Execute reservation commands
pub async fn execute(
    args: &ReservationArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect(config).await?;
    let store = super::booking_store(&db);

    match &args.command {
        ReservationCommand::List {
            filter,
            page,
            limit,
        } => {
            let result = store
                .list_reservations(
                    &ReservationFilter::from(filter),
                    &PageRequest::new(*page, *limit),
                )
                .await?;
            let rows: Vec<ReservationRow> = result
                .items
                .iter()
                .map(|r| ReservationRow {
                    id: r.id.to_string(),
                    date: r.reservation_date.to_string(),
                    time: r.reservation_time.format("%H:%M").to_string(),
                    party: r.party_size,
                    customer: r.customer_name.clone(),
                    table: r
                        .table_id
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    status: r.status.to_string(),
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
        ReservationCommand::Stats { filter } => {
            let counts = store
                .count_by_status(&ReservationFilter::from(filter))
                .await?;
            output::print_item(&counts, format);
        }
    }

    db.close().await;
    Ok(())
}
