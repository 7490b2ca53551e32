//! User listing commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tablebook_core::config::AppConfig;
use tablebook_core::error::AppError;
use tablebook_core::types::pagination::PageRequest;
use tablebook_database::repositories::UserRepository;
use tablebook_service::UserStore;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List accounts, newest first
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Page size
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    role: String,
    created_at: String,
    last_login_at: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect(config).await?;
    let users = UserRepository::new(db.pool().clone());

    match &args.command {
        UserCommand::List { page, limit } => {
            let result = UserStore::list(&users, &PageRequest::new(*page, *limit)).await?;
            let rows: Vec<UserRow> = result
                .items
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    username: u.username.clone(),
                    email: u.email.clone().unwrap_or_default(),
                    role: u.role.to_string(),
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    last_login_at: u
                        .last_login_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "never".to_string()),
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
