//! Admin account management commands.

use std::sync::Arc;

use clap::{Args, Subcommand};

use tablebook_auth::jwt::{JwtDecoder, JwtEncoder};
use tablebook_auth::password::{PasswordHasher, PasswordValidator};
use tablebook_core::config::AppConfig;
use tablebook_core::error::AppError;
use tablebook_database::repositories::UserRepository;
use tablebook_entity::user::UserRole;
use tablebook_service::AccountService;
use tablebook_service::user::NewAccount;

use crate::output::{self, OutputFormat};

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a new admin account
    Create {
        /// Username
        #[arg(short, long)]
        username: Option<String>,
        /// Email
        #[arg(short = 'm', long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        AdminCommand::Create {
            username,
            email,
            password,
        } => {
            let username = match username {
                Some(u) => u.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Admin username")
                    .interact_text()
                    .map_err(input_error)?,
            };

            let email = match email {
                Some(e) => Some(e.clone()),
                None => {
                    let e: String = dialoguer::Input::new()
                        .with_prompt("Admin email (optional, press Enter to skip)")
                        .allow_empty(true)
                        .interact_text()
                        .map_err(input_error)?;
                    if e.is_empty() { None } else { Some(e) }
                }
            };

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(input_error)?,
            };

            let db = super::connect(config).await?;
            let accounts = AccountService::new(
                Arc::new(UserRepository::new(db.pool().clone())),
                Arc::new(PasswordHasher::new()),
                Arc::new(PasswordValidator::new(&config.auth)),
                Arc::new(JwtEncoder::new(&config.auth)),
                Arc::new(JwtDecoder::new(&config.auth)),
                config.booking.store_timeout(),
            );

            let account = NewAccount {
                display_name: Some(username.clone()),
                username,
                email,
                password,
            };
            let user = accounts.create_user(&account, UserRole::Admin).await?;
            db.close().await;

            output::print_success(&format!(
                "Admin user '{}' created (id: {})",
                user.username, user.id
            ));
            if format == OutputFormat::Json {
                output::print_item(&user, format);
            }
        }
    }

    Ok(())
}

fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}
