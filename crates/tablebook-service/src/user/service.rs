//! Account operations: registration, login, token refresh, profile.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tablebook_admission::store::timeout::bounded;
use tablebook_auth::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use tablebook_auth::password::{PasswordHasher, PasswordValidator};
use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_entity::user::{CreateUser, User, UserRole};

use super::store::UserStore;
use crate::context::RequestContext;

/// Data for a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: Option<String>,
    /// Plaintext password, checked against the password policy.
    pub password: String,
    /// Display name.
    pub display_name: Option<String>,
}

/// Handles account lifecycle and authentication.
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    store_timeout: Duration,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            encoder,
            decoder,
            store_timeout,
        }
    }

    /// Register a customer account.
    pub async fn register(&self, account: &NewAccount) -> AppResult<User> {
        self.create_user(account, UserRole::Customer).await
    }

    /// Create an account with an explicit role.
    pub async fn create_user(&self, account: &NewAccount, role: UserRole) -> AppResult<User> {
        let username = account.username.trim();
        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        self.validator.validate(&account.password, &[username])?;

        let data = CreateUser {
            username: username.to_string(),
            email: account.email.clone(),
            password_hash: self.hasher.hash_password(&account.password)?,
            display_name: account.display_name.clone(),
            role,
        };
        let user = bounded(self.store_timeout, "create_user", self.users.create(&data)).await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "Account created");
        Ok(user)
    }

    /// Authenticate with username and password.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(User, TokenPair)> {
        let user = bounded(
            self.store_timeout,
            "find_user",
            self.users.find_by_username(username),
        )
        .await?;

        let Some(user) = user else {
            warn!(username = %username, "Login failed: unknown user");
            return Err(AppError::authentication("Invalid username or password"));
        };
        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(username = %username, "Login failed: wrong password");
            return Err(AppError::authentication("Invalid username or password"));
        }

        bounded(self.store_timeout, "touch_login", self.users.touch_login(user.id)).await?;
        let tokens = self
            .encoder
            .generate_token_pair(user.id, user.role, &user.username)?;

        info!(user_id = %user.id, "User logged in");
        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The role is re-read from the store so role changes apply on refresh.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;
        let user = bounded(
            self.store_timeout,
            "find_user",
            self.users.find_by_id(claims.user_id()),
        )
        .await?
        .ok_or_else(|| AppError::authentication("Account no longer exists"))?;

        self.encoder
            .generate_token_pair(user.id, user.role, &user.username)
    }

    /// The caller's account.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        bounded(
            self.store_timeout,
            "find_user",
            self.users.find_by_id(ctx.user_id),
        )
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
    }
}
