//! Reservation list filters and aggregate counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Reservation;
use super::status::ReservationStatus;

/// Filter applied to reservation listings and counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationFilter {
    /// Restrict to one venue.
    pub venue_id: Option<Uuid>,
    /// Restrict to one submitting account.
    pub user_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<ReservationStatus>,
    /// Earliest visit date (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Latest visit date (inclusive).
    pub date_to: Option<NaiveDate>,
}

impl ReservationFilter {
    /// Whether `reservation` passes every set criterion.
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.venue_id.is_none_or(|v| reservation.venue_id == v)
            && self.user_id.is_none_or(|u| reservation.user_id == Some(u))
            && self.status.is_none_or(|s| reservation.status == s)
            && self
                .date_from
                .is_none_or(|from| reservation.reservation_date >= from)
            && self
                .date_to
                .is_none_or(|to| reservation.reservation_date <= to)
    }
}

/// Number of reservations per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationCounts {
    /// Awaiting a decision.
    pub pending: u64,
    /// Confirmed.
    pub approved: u64,
    /// Declined.
    pub rejected: u64,
    /// Withdrawn.
    pub cancelled: u64,
    /// Sum of all statuses.
    pub total: u64,
}

impl ReservationCounts {
    /// Add `count` reservations of `status`.
    pub fn add(&mut self, status: ReservationStatus, count: u64) {
        match status {
            ReservationStatus::Pending => self.pending += count,
            ReservationStatus::Approved => self.approved += count,
            ReservationStatus::Rejected => self.rejected += count,
            ReservationStatus::Cancelled => self.cancelled += count,
        }
        self.total += count;
    }
}
