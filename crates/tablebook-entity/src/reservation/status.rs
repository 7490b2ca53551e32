//! Reservation status and the legal transitions between statuses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tablebook_core::AppError;

/// Status of a reservation.
///
/// ```text
/// pending ──► approved ──► cancelled
///    │  └──► rejected
///    └─────────────────► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Admitted, awaiting an administrator's decision.
    Pending,
    /// Confirmed by an administrator.
    #[serde(alias = "confirmed")]
    Approved,
    /// Declined by an administrator.
    Rejected,
    /// Withdrawn by the requester or an administrator.
    Cancelled,
}

impl ReservationStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Statuses that no longer hold capacity in their slot.
    pub const RELEASED: [Self; 2] = [Self::Rejected, Self::Cancelled];

    /// Whether a reservation in this status occupies its slot.
    pub fn holds_capacity(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Pending, Self::Cancelled)
                | (Self::Approved, Self::Cancelled)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" | "confirmed" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(AppError::validation(format!(
                "Invalid reservation status: '{s}'. Expected one of: pending, approved, rejected, cancelled"
            ))),
        }
    }
}
