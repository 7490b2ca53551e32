//! Requester-facing reservation operations.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use tablebook_admission::{AdmissionEngine, ReservationRequest, SlotAvailability, Transition};
use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::reservation::{Reservation, ReservationFilter};

use crate::context::RequestContext;

/// Handles reservation submission and self-service by requesters.
#[derive(Debug, Clone)]
pub struct ReservationService {
    engine: AdmissionEngine,
}

impl ReservationService {
    /// Creates a new reservation service.
    pub fn new(engine: AdmissionEngine) -> Self {
        Self { engine }
    }

    /// Submit a reservation request for a venue on behalf of the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        venue_id: Uuid,
        request: &ReservationRequest,
    ) -> AppResult<Reservation> {
        self.engine
            .submit(venue_id, request, Some(ctx.user_id))
            .await
    }

    /// Fetch a reservation the caller owns (or any, for admins).
    ///
    /// Reservations of other users are reported as not found.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Reservation> {
        let reservation = self
            .engine
            .store()
            .find_reservation(id)
            .await?
            .filter(|r| ctx.actor().can_view(r))
            .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;
        Ok(reservation)
    }

    /// The caller's own reservations, newest first.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let filter = ReservationFilter {
            user_id: Some(ctx.user_id),
            ..Default::default()
        };
        self.engine.store().list_reservations(&filter, page).await
    }

    /// Cancel a reservation as its owner or an administrator.
    pub async fn cancel(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Reservation> {
        self.engine.apply(id, Transition::Cancel, &ctx.actor()).await
    }

    /// Slot availability for a venue.
    pub async fn availability(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<SlotAvailability> {
        self.engine.availability(venue_id, date, time).await
    }
}
