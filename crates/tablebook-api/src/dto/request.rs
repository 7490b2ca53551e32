//! Request DTOs with validation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tablebook_entity::reservation::{ReservationFilter, ReservationStatus};
use tablebook_entity::venue::{CreateVenue, UpdateVenue, VenueKind};
use tablebook_service::user::NewAccount;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Password.
    #[validate(length(min = 1, max = 256, message = "Password is required"))]
    pub password: String,
    /// Display name.
    #[validate(length(max = 128))]
    pub display_name: Option<String>,
}

impl From<RegisterRequest> for NewAccount {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            display_name: req.display_name,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Create venue request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVenueRequest {
    /// Venue name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Restaurant or hotel.
    pub kind: VenueKind,
    /// Street address.
    #[validate(length(max = 500))]
    pub address: Option<String>,
    /// Contact phone.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// Opening time.
    pub opens_at: NaiveTime,
    /// Closing time.
    pub closes_at: NaiveTime,
    /// Largest accepted party.
    #[validate(range(min = 1))]
    pub max_party_size: i32,
    /// Shared seat pool, used when the venue has no tables.
    #[validate(range(min = 1))]
    pub seat_capacity: i32,
}

impl From<CreateVenueRequest> for CreateVenue {
    fn from(req: CreateVenueRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            kind: req.kind,
            address: req.address,
            phone: req.phone,
            opens_at: req.opens_at,
            closes_at: req.closes_at,
            max_party_size: req.max_party_size,
            seat_capacity: req.seat_capacity,
        }
    }
}

/// Partial venue update (admin).
///
/// Absent fields are left unchanged; an empty `address` or `phone` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateVenueRequest {
    /// New name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<VenueKind>,
    /// New address.
    #[validate(length(max = 500))]
    pub address: Option<String>,
    /// New phone.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// New opening time.
    pub opens_at: Option<NaiveTime>,
    /// New closing time.
    pub closes_at: Option<NaiveTime>,
    /// New party limit.
    #[validate(range(min = 1))]
    pub max_party_size: Option<i32>,
    /// New seat pool.
    #[validate(range(min = 1))]
    pub seat_capacity: Option<i32>,
}

impl From<UpdateVenueRequest> for UpdateVenue {
    fn from(req: UpdateVenueRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            kind: req.kind,
            address: req.address.map(non_blank),
            phone: req.phone.map(non_blank),
            opens_at: req.opens_at,
            closes_at: req.closes_at,
            max_party_size: req.max_party_size,
            seat_capacity: req.seat_capacity,
        }
    }
}

/// An empty string clears an optional field.
fn non_blank(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Add table request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTableRequest {
    /// Label shown to staff, unique within the venue.
    #[validate(length(min = 1, max = 50))]
    pub label: String,
    /// Seats at the table.
    #[validate(range(min = 1))]
    pub capacity: i32,
}

/// Status change request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    /// Target status. `confirmed` is accepted for `approved`.
    pub status: ReservationStatus,
}

/// Slot availability query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Slot date.
    pub date: NaiveDate,
    /// Slot time, `HH:MM`.
    pub time: String,
}

/// Admin reservation listing filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminReservationQuery {
    /// Only this status.
    pub status: Option<ReservationStatus>,
    /// Only this venue.
    pub venue_id: Option<Uuid>,
    /// Earliest reservation date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest reservation date, inclusive.
    pub to: Option<NaiveDate>,
}

impl From<AdminReservationQuery> for ReservationFilter {
    fn from(query: AdminReservationQuery) -> Self {
        Self {
            venue_id: query.venue_id,
            user_id: None,
            status: query.status,
            date_from: query.from,
            date_to: query.to,
        }
    }
}

/// Reservation statistics query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsQuery {
    /// Restrict counts to one venue.
    pub venue_id: Option<Uuid>,
}
