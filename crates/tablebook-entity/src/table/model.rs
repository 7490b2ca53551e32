//! Dining table entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;

/// A bookable table belonging to exactly one venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DiningTable {
    /// Unique table identifier.
    pub id: Uuid,
    /// Owning venue.
    pub venue_id: Uuid,
    /// Label shown to staff ("T4", "Terrace 2"), unique per venue.
    pub label: String,
    /// Number of seats.
    pub capacity: i32,
    /// When the table was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to add a table to a venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTable {
    /// Owning venue.
    pub venue_id: Uuid,
    /// Label, unique per venue.
    pub label: String,
    /// Number of seats.
    pub capacity: i32,
}

impl CreateTable {
    /// Check the table invariants before persisting.
    pub fn validate(&self) -> AppResult<()> {
        if self.label.trim().is_empty() {
            return Err(AppError::validation("Table label must not be empty"));
        }
        if self.capacity < 1 {
            return Err(AppError::validation("Table capacity must be at least 1"));
        }
        Ok(())
    }
}
