//! Reservation lifecycle state machine.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_entity::reservation::{Reservation, ReservationStatus};

/// A requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    /// `pending -> approved` (administrators only).
    Approve,
    /// `pending -> rejected` (administrators only).
    Reject,
    /// `pending | approved -> cancelled` (owner or administrator).
    Cancel,
}

impl Transition {
    /// Resolve the transition that leads to `target`.
    pub fn to_status(target: ReservationStatus) -> AppResult<Self> {
        match target {
            ReservationStatus::Approved => Ok(Self::Approve),
            ReservationStatus::Rejected => Ok(Self::Reject),
            ReservationStatus::Cancelled => Ok(Self::Cancel),
            ReservationStatus::Pending => Err(AppError::validation(
                "A reservation cannot be moved back to pending",
            )
            .with_code("INVALID_TRANSITION")),
        }
    }

    /// Status after the transition.
    pub fn target(&self) -> ReservationStatus {
        match self {
            Self::Approve => ReservationStatus::Approved,
            Self::Reject => ReservationStatus::Rejected,
            Self::Cancel => ReservationStatus::Cancelled,
        }
    }

    /// Statuses the transition may start from.
    pub fn sources(&self) -> &'static [ReservationStatus] {
        match self {
            Self::Approve | Self::Reject => &[ReservationStatus::Pending],
            Self::Cancel => &[ReservationStatus::Pending, ReservationStatus::Approved],
        }
    }

    /// Whether only administrators may perform it.
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::Approve | Self::Reject)
    }

    /// Present-tense verb for messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }
}

/// Who is asking for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Authenticated account.
    pub user_id: Uuid,
    /// Whether the account holds the admin role.
    pub is_admin: bool,
}

impl Actor {
    /// Whether the actor may read `reservation`.
    pub fn can_view(&self, reservation: &Reservation) -> bool {
        self.is_admin || reservation.is_owned_by(self.user_id)
    }
}

/// Check that `actor` may apply `transition` to `reservation`.
pub fn authorize(actor: &Actor, transition: Transition, reservation: &Reservation) -> AppResult<()> {
    if transition.requires_admin() && !actor.is_admin {
        return Err(AppError::authorization(format!(
            "Only administrators can {} reservations",
            transition.verb()
        )));
    }
    if !actor.can_view(reservation) {
        return Err(AppError::authorization(
            "Only the requester or an administrator can cancel this reservation",
        ));
    }
    Ok(())
}

/// Error for a transition attempted from a status that does not allow it.
pub fn invalid_transition(current: ReservationStatus, transition: Transition) -> AppError {
    AppError::conflict(format!(
        "Cannot {} a reservation that is {current}",
        transition.verb()
    ))
    .with_code("INVALID_TRANSITION")
    .with_details(json!({
        "from": current,
        "to": transition.target(),
    }))
}
