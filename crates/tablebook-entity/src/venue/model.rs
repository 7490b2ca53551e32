//! Venue entity model.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;

use super::hours::OperatingHours;

/// Kind of establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "venue_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    /// Restaurant dining room.
    Restaurant,
    /// Hotel dining or event space.
    Hotel,
}

/// A restaurant or hotel accepting reservations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venue {
    /// Unique venue identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Kind of establishment.
    pub kind: VenueKind,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// First bookable time of day.
    pub opens_at: NaiveTime,
    /// Last bookable time of day.
    pub closes_at: NaiveTime,
    /// Largest party accepted in a single reservation.
    pub max_party_size: i32,
    /// Seats available per slot when the venue tracks no tables.
    pub seat_capacity: i32,
    /// When the venue was created.
    pub created_at: DateTime<Utc>,
    /// When the venue was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    /// The venue's operating-hours window.
    pub fn operating_hours(&self) -> OperatingHours {
        OperatingHours {
            opens_at: self.opens_at,
            closes_at: self.closes_at,
        }
    }

    /// Apply a partial update in place, re-checking the venue invariants.
    pub fn apply(&mut self, update: &UpdateVenue) -> AppResult<()> {
        if let Some(ref name) = update.name {
            self.name = name.clone();
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(ref address) = update.address {
            self.address = address.clone();
        }
        if let Some(ref phone) = update.phone {
            self.phone = phone.clone();
        }
        if let Some(opens_at) = update.opens_at {
            self.opens_at = opens_at;
        }
        if let Some(closes_at) = update.closes_at {
            self.closes_at = closes_at;
        }
        if let Some(max_party_size) = update.max_party_size {
            self.max_party_size = max_party_size;
        }
        if let Some(seat_capacity) = update.seat_capacity {
            self.seat_capacity = seat_capacity;
        }
        check_settings(
            &self.name,
            self.opens_at,
            self.closes_at,
            self.max_party_size,
            self.seat_capacity,
        )
    }
}

/// Data required to create a new venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVenue {
    /// Display name.
    pub name: String,
    /// Kind of establishment.
    pub kind: VenueKind,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// First bookable time of day.
    pub opens_at: NaiveTime,
    /// Last bookable time of day.
    pub closes_at: NaiveTime,
    /// Largest party accepted.
    pub max_party_size: i32,
    /// Seat inventory.
    pub seat_capacity: i32,
}

impl CreateVenue {
    /// Check the venue invariants before persisting.
    pub fn validate(&self) -> AppResult<()> {
        check_settings(
            &self.name,
            self.opens_at,
            self.closes_at,
            self.max_party_size,
            self.seat_capacity,
        )
    }
}

/// Partial administrative update of a venue.
///
/// `address` and `phone` use a nested `Option` so they can be cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVenue {
    /// New display name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<VenueKind>,
    /// New address (`Some(None)` clears it).
    pub address: Option<Option<String>>,
    /// New phone (`Some(None)` clears it).
    pub phone: Option<Option<String>>,
    /// New opening time.
    pub opens_at: Option<NaiveTime>,
    /// New closing time.
    pub closes_at: Option<NaiveTime>,
    /// New maximum party size.
    pub max_party_size: Option<i32>,
    /// New seat inventory.
    pub seat_capacity: Option<i32>,
}

fn check_settings(
    name: &str,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    max_party_size: i32,
    seat_capacity: i32,
) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Venue name must not be empty"));
    }
    if OperatingHours::new(opens_at, closes_at).is_none() {
        return Err(AppError::validation(format!(
            "Opening time {opens_at} must be before closing time {closes_at}"
        )));
    }
    if max_party_size < 1 {
        return Err(AppError::validation("max_party_size must be at least 1"));
    }
    if seat_capacity < 1 {
        return Err(AppError::validation("seat_capacity must be at least 1"));
    }
    Ok(())
}
