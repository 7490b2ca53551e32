//! Reasons a reservation request is refused admission.

use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use tablebook_core::error::{AppError, ErrorKind};

/// A violated admission rule.
///
/// Every variant maps to a stable machine-readable [`code`](Self::code)
/// reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// A required field is absent or blank.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },

    /// The date is not a valid `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The value as submitted.
        value: String,
    },

    /// The date lies before today.
    #[error("Reservation date {date} is in the past")]
    PastDate {
        /// Requested date.
        date: NaiveDate,
        /// Date the request was evaluated on.
        today: NaiveDate,
    },

    /// The time is unparseable or outside the venue's window.
    #[error(
        "Time '{time}' is outside operating hours {}-{}",
        .opens_at.format("%H:%M"),
        .closes_at.format("%H:%M")
    )]
    OutsideOperatingHours {
        /// The time as submitted.
        time: String,
        /// Venue opening time.
        opens_at: NaiveTime,
        /// Venue closing time.
        closes_at: NaiveTime,
    },

    /// The party is not positive or is larger than the venue allows.
    #[error("Party size {party_size} must be between 1 and {max_party_size}")]
    PartySizeExceeded {
        /// Requested party size.
        party_size: i64,
        /// Venue maximum.
        max_party_size: i32,
    },

    /// The explicitly requested table seats fewer guests than the party.
    #[error("Table {table_id} seats {capacity}, party of {party_size} does not fit")]
    TableCapacityExceeded {
        /// Requested table.
        table_id: Uuid,
        /// Its seat count.
        capacity: i32,
        /// Requested party size.
        party_size: i32,
    },

    /// The slot has no remaining capacity for this party.
    #[error(
        "No capacity left for a party of {party_size} on {date} at {}",
        .time.format("%H:%M")
    )]
    SlotConflict {
        /// Slot date.
        date: NaiveDate,
        /// Slot time.
        time: NaiveTime,
        /// Requested party size.
        party_size: i32,
    },
}

impl RejectionReason {
    /// Machine-readable rule code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::PastDate { .. } => "PAST_DATE",
            Self::OutsideOperatingHours { .. } => "OUTSIDE_OPERATING_HOURS",
            Self::PartySizeExceeded { .. } => "PARTY_SIZE_EXCEEDED",
            Self::TableCapacityExceeded { .. } => "TABLE_CAPACITY_EXCEEDED",
            Self::SlotConflict { .. } => "SLOT_CONFLICT",
        }
    }

    /// The error kind this rejection surfaces as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SlotConflict { .. } => ErrorKind::Conflict,
            _ => ErrorKind::Validation,
        }
    }

    /// Structured details describing the violation.
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::MissingField { field } => json!({ "field": field }),
            Self::InvalidDate { value } => json!({ "date": value }),
            Self::PastDate { date, today } => json!({
                "date": date.to_string(),
                "today": today.to_string(),
            }),
            Self::OutsideOperatingHours {
                time,
                opens_at,
                closes_at,
            } => json!({
                "time": time,
                "opensAt": opens_at.format("%H:%M").to_string(),
                "closesAt": closes_at.format("%H:%M").to_string(),
            }),
            Self::PartySizeExceeded {
                party_size,
                max_party_size,
            } => json!({
                "partySize": party_size,
                "maxPartySize": max_party_size,
            }),
            Self::TableCapacityExceeded {
                table_id,
                capacity,
                party_size,
            } => json!({
                "tableId": table_id,
                "capacity": capacity,
                "partySize": party_size,
            }),
            Self::SlotConflict {
                date,
                time,
                party_size,
            } => json!({
                "date": date.to_string(),
                "time": time.format("%H:%M").to_string(),
                "partySize": party_size,
            }),
        }
    }
}

impl From<RejectionReason> for AppError {
    fn from(reason: RejectionReason) -> Self {
        AppError::new(reason.kind(), reason.to_string())
            .with_code(reason.code())
            .with_details(reason.details())
    }
}
