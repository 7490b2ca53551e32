//! Persistence port for venues, tables, and reservations.
//!
//! Two implementations exist: [`memory::MemoryBookingStore`] in this crate
//! and the PostgreSQL store in `tablebook-database`. The engine wraps
//! whichever one is configured in a [`timeout::TimeoutStore`].

pub mod memory;
pub mod timeout;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::reservation::{
    Reservation, ReservationCounts, ReservationFilter, ReservationStatus,
};
use tablebook_entity::table::{CreateTable, DiningTable};
use tablebook_entity::venue::{CreateVenue, UpdateVenue, Venue};

use crate::validator::ValidatedRequest;

pub use memory::MemoryBookingStore;
pub use timeout::TimeoutStore;

/// Storage backend for the admission engine.
///
/// Implementations must make [`admit`](Self::admit) atomic per slot:
/// two concurrent admissions for the same `(venue, date, time)` must never
/// both observe the same free capacity.
#[async_trait]
pub trait BookingStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new venue.
    async fn create_venue(&self, data: &CreateVenue) -> AppResult<Venue>;

    /// Apply a partial update to a venue in one atomic step, so concurrent
    /// updates to different fields both survive. Returns `None` if the venue
    /// no longer exists.
    async fn update_venue(&self, id: Uuid, update: &UpdateVenue) -> AppResult<Option<Venue>>;

    /// Delete a venue with its tables and reservations.
    async fn delete_venue(&self, id: Uuid) -> AppResult<bool>;

    /// Find a venue by ID.
    async fn find_venue(&self, id: Uuid) -> AppResult<Option<Venue>>;

    /// List venues ordered by name.
    async fn list_venues(&self, page: &PageRequest) -> AppResult<PageResponse<Venue>>;

    /// Add a table. Fails with a conflict if the label is taken in the venue.
    async fn create_table(&self, data: &CreateTable) -> AppResult<DiningTable>;

    /// Remove a table. Its reservations keep their slot but lose the table link.
    async fn delete_table(&self, venue_id: Uuid, table_id: Uuid) -> AppResult<bool>;

    /// A venue's tables ordered by label.
    async fn list_tables(&self, venue_id: Uuid) -> AppResult<Vec<DiningTable>>;

    /// Reservations in a slot whose status is not in `exclude`, oldest first.
    async fn find_in_slot(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: &[ReservationStatus],
    ) -> AppResult<Vec<Reservation>>;

    /// Plan and insert a `pending` reservation as one atomic unit.
    ///
    /// The venue, its tables and the slot's active reservations are re-read
    /// under the slot lock before planning.
    async fn admit(
        &self,
        venue_id: Uuid,
        request: &ValidatedRequest,
        user_id: Option<Uuid>,
    ) -> AppResult<Reservation>;

    /// Find a reservation by ID.
    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>>;

    /// Set `to` only if the current status is one of `from`.
    ///
    /// Returns `None` when nothing matched, either because the reservation
    /// does not exist or because its status changed.
    async fn transition(
        &self,
        id: Uuid,
        from: &[ReservationStatus],
        to: ReservationStatus,
    ) -> AppResult<Option<Reservation>>;

    /// Permanently delete a reservation.
    async fn delete_reservation(&self, id: Uuid) -> AppResult<bool>;

    /// Filtered reservation listing, newest first.
    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>>;

    /// Count reservations per status.
    async fn count_by_status(&self, filter: &ReservationFilter) -> AppResult<ReservationCounts>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
