//! PostgreSQL implementation of the booking store.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use tablebook_admission::conflict::plan_admission;
use tablebook_admission::store::BookingStore;
use tablebook_admission::validator::ValidatedRequest;
use tablebook_admission::RejectionReason;
use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::reservation::{
    Reservation, ReservationCounts, ReservationFilter, ReservationStatus,
};
use tablebook_entity::table::{CreateTable, DiningTable};
use tablebook_entity::venue::{CreateVenue, UpdateVenue, Venue};

use crate::connection::ping;
use crate::repositories::{ReservationRepository, TableRepository, VenueRepository};

/// Booking store backed by PostgreSQL.
///
/// Admission runs in one transaction holding an advisory lock on the
/// slot. The partial unique index on active `(table_id, date, time)` rows
/// backs the lock up.
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: PgPool,
    venues: VenueRepository,
    tables: TableRepository,
    reservations: ReservationRepository,
}

impl PgBookingStore {
    /// Create a store over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            venues: VenueRepository::new(pool.clone()),
            tables: TableRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            pool,
        }
    }
}

fn tx_error(e: sqlx::Error, context: &'static str) -> AppError {
    AppError::with_source(ErrorKind::Database, context, e)
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create_venue(&self, data: &CreateVenue) -> AppResult<Venue> {
        self.venues.create(data).await
    }

    async fn update_venue(&self, id: Uuid, update: &UpdateVenue) -> AppResult<Option<Venue>> {
        self.venues.update(id, update).await
    }

    async fn delete_venue(&self, id: Uuid) -> AppResult<bool> {
        self.venues.delete(id).await
    }

    async fn find_venue(&self, id: Uuid) -> AppResult<Option<Venue>> {
        self.venues.find_by_id(id).await
    }

    async fn list_venues(&self, page: &PageRequest) -> AppResult<PageResponse<Venue>> {
        self.venues.find_all(page).await
    }

    async fn create_table(&self, data: &CreateTable) -> AppResult<DiningTable> {
        if self.venues.find_by_id(data.venue_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Venue {} not found",
                data.venue_id
            )));
        }
        self.tables.create(data).await
    }

    async fn delete_table(&self, venue_id: Uuid, table_id: Uuid) -> AppResult<bool> {
        self.tables.delete(venue_id, table_id).await
    }

    async fn list_tables(&self, venue_id: Uuid) -> AppResult<Vec<DiningTable>> {
        self.tables.find_by_venue(venue_id).await
    }

    async fn find_in_slot(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: &[ReservationStatus],
    ) -> AppResult<Vec<Reservation>> {
        self.reservations
            .find_in_slot(venue_id, date, time, exclude)
            .await
    }

    async fn admit(
        &self,
        venue_id: Uuid,
        request: &ValidatedRequest,
        user_id: Option<Uuid>,
    ) -> AppResult<Reservation> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| tx_error(e, "Failed to begin admission transaction"))?;

        ReservationRepository::lock_slot(&mut *tx, venue_id, request.date, request.time).await?;

        let venue = VenueRepository::find_for_share(&mut *tx, venue_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Venue {venue_id} not found")))?;
        let tables = TableRepository::find_by_venue_in(&mut *tx, venue_id).await?;
        let active = ReservationRepository::find_in_slot_in(
            &mut *tx,
            venue_id,
            request.date,
            request.time,
            &ReservationStatus::RELEASED,
        )
        .await?;

        let assignment = plan_admission(
            &venue,
            &tables,
            &active,
            request.date,
            request.time,
            request.party_size,
            request.table_id,
        )?;

        let data = request.to_new_reservation(venue_id, assignment.table_id(), user_id);
        let reservation = match ReservationRepository::insert_in(&mut *tx, &data).await {
            Ok(r) => r,
            Err(e) if is_unique_violation(&e) => {
                return Err(RejectionReason::SlotConflict {
                    date: request.date,
                    time: request.time,
                    party_size: request.party_size,
                }
                .into());
            }
            Err(e) => return Err(e),
        };

        tx.commit()
            .await
            .map_err(|e| tx_error(e, "Failed to commit admission"))?;

        debug!(reservation_id = %reservation.id, "Reservation stored");
        Ok(reservation)
    }

    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        self.reservations.find_by_id(id).await
    }

    async fn transition(
        &self,
        id: Uuid,
        from: &[ReservationStatus],
        to: ReservationStatus,
    ) -> AppResult<Option<Reservation>> {
        self.reservations.transition(id, from, to).await
    }

    async fn delete_reservation(&self, id: Uuid) -> AppResult<bool> {
        self.reservations.delete(id).await
    }

    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        self.reservations.find_filtered(filter, page).await
    }

    async fn count_by_status(&self, filter: &ReservationFilter) -> AppResult<ReservationCounts> {
        self.reservations.count_by_status(filter).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        ping(&self.pool).await
    }
}

/// Whether an insert failed on the active-slot unique index.
fn is_unique_violation(err: &AppError) -> bool {
    err.source
        .as_ref()
        .and_then(|s| s.downcast_ref::<sqlx::Error>())
        .and_then(|e| match e {
            sqlx::Error::Database(db) => Some(db.is_unique_violation()),
            _ => None,
        })
        .unwrap_or(false)
}
