//! Reservation entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ReservationStatus;

/// A table reservation at a venue.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique reservation identifier.
    pub id: Uuid,
    /// Venue the reservation belongs to.
    pub venue_id: Uuid,
    /// Table assigned at admission (table-tracking venues only).
    pub table_id: Option<Uuid>,
    /// Account that submitted the reservation.
    pub user_id: Option<Uuid>,
    /// Guest name.
    pub customer_name: String,
    /// Guest email.
    pub email: String,
    /// Guest phone.
    pub phone: String,
    /// Calendar date of the visit.
    pub reservation_date: NaiveDate,
    /// Time of day of the visit.
    pub reservation_time: NaiveTime,
    /// Number of guests.
    pub party_size: i32,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Lifecycle status.
    pub status: ReservationStatus,
    /// When the reservation was created (admission order).
    pub created_at: DateTime<Utc>,
    /// When the reservation was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Whether `user_id` submitted this reservation.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Data written when a reservation is admitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    /// Venue.
    pub venue_id: Uuid,
    /// Assigned table.
    pub table_id: Option<Uuid>,
    /// Submitting account.
    pub user_id: Option<Uuid>,
    /// Guest name.
    pub customer_name: String,
    /// Guest email.
    pub email: String,
    /// Guest phone.
    pub phone: String,
    /// Visit date.
    pub reservation_date: NaiveDate,
    /// Visit time.
    pub reservation_time: NaiveTime,
    /// Number of guests.
    pub party_size: i32,
    /// Notes.
    pub notes: Option<String>,
}
