//! Administrative reservation management: review, status changes, removal.

use tracing::info;
use uuid::Uuid;

use tablebook_admission::{AdmissionEngine, Transition};
use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::reservation::{
    Reservation, ReservationCounts, ReservationFilter, ReservationStatus,
};

use crate::context::RequestContext;

/// Handles administrative reservation operations.
#[derive(Debug, Clone)]
pub struct AdminReservationService {
    engine: AdmissionEngine,
}

impl AdminReservationService {
    /// Creates a new admin reservation service.
    pub fn new(engine: AdmissionEngine) -> Self {
        Self { engine }
    }

    /// List reservations matching `filter`.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        ctx.require_admin()?;
        if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
            if from > to {
                return Err(AppError::validation(format!(
                    "Date range start {from} is after its end {to}"
                )));
            }
        }
        self.engine.store().list_reservations(filter, page).await
    }

    /// Move a reservation to `status` (approved, rejected, or cancelled).
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: ReservationStatus,
    ) -> AppResult<Reservation> {
        ctx.require_admin()?;
        let transition = Transition::to_status(status)?;
        self.engine.apply(id, transition, &ctx.actor()).await
    }

    /// Permanently delete a reservation.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        ctx.require_admin()?;
        if !self.engine.store().delete_reservation(id).await? {
            return Err(AppError::not_found(format!("Reservation {id} not found")));
        }
        info!(reservation_id = %id, admin = %ctx.user_id, "Reservation deleted");
        Ok(())
    }

    /// Reservation counts per status.
    pub async fn stats(
        &self,
        ctx: &RequestContext,
        filter: &ReservationFilter,
    ) -> AppResult<ReservationCounts> {
        ctx.require_admin()?;
        self.engine.store().count_by_status(filter).await
    }
}
