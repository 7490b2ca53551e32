//! Admission validator.
//!
//! A pure check of a raw reservation request against a venue's rules.
//! Checks run in a fixed order and stop at the first violation:
//!
//! 1. required fields are present and non-blank
//! 2. the date parses and is not before today
//! 3. the time parses as `HH:MM` and lies within operating hours
//! 4. the party size is positive and within the venue maximum

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tablebook_entity::reservation::NewReservation;
use tablebook_entity::venue::Venue;

use crate::rejection::RejectionReason;

/// A reservation request as submitted by a requester.
///
/// Every field is optional so that absence is reported as a rule
/// violation rather than a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// Guest name.
    pub customer_name: Option<String>,
    /// Guest email.
    pub email: Option<String>,
    /// Guest phone.
    pub phone: Option<String>,
    /// Visit date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Visit time, `HH:MM` (24-hour).
    pub time: Option<String>,
    /// Number of guests.
    pub party_size: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Specific table to book.
    pub table_id: Option<Uuid>,
}

/// A request that passed every validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Guest name, trimmed.
    pub customer_name: String,
    /// Guest email, trimmed.
    pub email: String,
    /// Guest phone, trimmed.
    pub phone: String,
    /// Visit date.
    pub date: NaiveDate,
    /// Visit time.
    pub time: NaiveTime,
    /// Number of guests.
    pub party_size: i32,
    /// Notes, `None` when blank.
    pub notes: Option<String>,
    /// Specific table requested.
    pub table_id: Option<Uuid>,
}

impl ValidatedRequest {
    /// Build the row to insert once a slot has been assigned.
    pub fn to_new_reservation(
        &self,
        venue_id: Uuid,
        table_id: Option<Uuid>,
        user_id: Option<Uuid>,
    ) -> NewReservation {
        NewReservation {
            venue_id,
            table_id,
            user_id,
            customer_name: self.customer_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            reservation_date: self.date,
            reservation_time: self.time,
            party_size: self.party_size,
            notes: self.notes.clone(),
        }
    }
}

/// Validate `request` against `venue` as of `today`.
pub fn validate(
    request: &ReservationRequest,
    venue: &Venue,
    today: NaiveDate,
) -> Result<ValidatedRequest, RejectionReason> {
    let customer_name = required("customerName", request.customer_name.as_deref())?;
    let email = required("email", request.email.as_deref())?;
    let phone = required("phone", request.phone.as_deref())?;
    let raw_date = required("date", request.date.as_deref())?;
    let raw_time = required("time", request.time.as_deref())?;
    let party_size = match request.party_size {
        None | Some(0) => return Err(RejectionReason::MissingField { field: "partySize" }),
        Some(n) => n,
    };

    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
        RejectionReason::InvalidDate {
            value: raw_date.to_string(),
        }
    })?;
    if date < today {
        return Err(RejectionReason::PastDate { date, today });
    }

    let hours = venue.operating_hours();
    let time = parse_time(raw_time)
        .filter(|t| hours.contains(*t))
        .ok_or_else(|| RejectionReason::OutsideOperatingHours {
            time: raw_time.to_string(),
            opens_at: hours.opens_at,
            closes_at: hours.closes_at,
        })?;

    if party_size < 1 || party_size > i64::from(venue.max_party_size) {
        return Err(RejectionReason::PartySizeExceeded {
            party_size,
            max_party_size: venue.max_party_size,
        });
    }

    Ok(ValidatedRequest {
        customer_name: customer_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        date,
        time,
        // Bounded by max_party_size above.
        party_size: party_size as i32,
        notes: request
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        table_id: request.table_id,
    })
}

/// Parse a strict 24-hour `HH:MM` time.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let (hours, minutes) = value.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, RejectionReason> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(RejectionReason::MissingField { field })
}
