//! The reservation admission engine.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};
use uuid::Uuid;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_entity::reservation::{Reservation, ReservationStatus};
use tablebook_entity::venue::Venue;

use crate::clock::{Clock, SystemClock};
use crate::conflict::{SlotAvailability, project_tables, seats_booked};
use crate::lifecycle::{self, Actor, Transition};
use crate::store::{BookingStore, TimeoutStore};
use crate::validator::{self, ReservationRequest, ValidatedRequest};

/// Validates, conflict-checks and persists reservation requests, and
/// drives their later status changes.
///
/// Every store call is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct AdmissionEngine {
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
}

impl AdmissionEngine {
    /// Create an engine over `store`, bounding each call by `store_timeout`.
    pub fn new(store: Arc<dyn BookingStore>, store_timeout: Duration) -> Self {
        Self {
            store: Arc::new(TimeoutStore::new(store, store_timeout)),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to decide what "today" is.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The bounded store, for read paths outside admission.
    pub fn store(&self) -> &Arc<dyn BookingStore> {
        &self.store
    }

    /// Today's date according to the engine clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Load a venue or fail with `NotFound`.
    pub async fn venue(&self, venue_id: Uuid) -> AppResult<Venue> {
        self.store
            .find_venue(venue_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Venue {venue_id} not found")))
    }

    /// Run the validator for `request` against the venue.
    pub async fn validate(
        &self,
        venue_id: Uuid,
        request: &ReservationRequest,
    ) -> AppResult<ValidatedRequest> {
        let venue = self.venue(venue_id).await?;
        validator::validate(request, &venue, self.today()).map_err(AppError::from)
    }

    /// Admit a reservation request.
    ///
    /// On success the reservation is persisted as `pending`. A request
    /// arriving after the slot's capacity is exhausted is refused with
    /// `SLOT_CONFLICT`; it is not queued.
    pub async fn submit(
        &self,
        venue_id: Uuid,
        request: &ReservationRequest,
        user_id: Option<Uuid>,
    ) -> AppResult<Reservation> {
        let validated = match self.validate(venue_id, request).await {
            Ok(v) => v,
            Err(e) => {
                info!(venue_id = %venue_id, code = ?e.code, "Reservation request rejected");
                return Err(e);
            }
        };

        let reservation = self
            .store
            .admit(venue_id, &validated, user_id)
            .await
            .inspect_err(|e| {
                info!(
                    venue_id = %venue_id,
                    date = %validated.date,
                    time = %validated.time,
                    code = ?e.code,
                    "Reservation not admitted"
                );
            })?;

        info!(
            reservation_id = %reservation.id,
            venue_id = %venue_id,
            table_id = ?reservation.table_id,
            party_size = reservation.party_size,
            "Reservation admitted"
        );
        Ok(reservation)
    }

    /// Active reservations occupying a slot, oldest first.
    pub async fn find_conflicts(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<Vec<Reservation>> {
        self.store
            .find_in_slot(venue_id, date, time, &ReservationStatus::RELEASED)
            .await
    }

    /// Per-table projection and pooled seat count for a slot.
    pub async fn availability(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<SlotAvailability> {
        let venue = self.venue(venue_id).await?;
        let tables = self.store.list_tables(venue_id).await?;
        let active = self.find_conflicts(venue_id, date, time).await?;

        let booked = seats_booked(&active);
        let seats_remaining = tables
            .is_empty()
            .then(|| (i64::from(venue.seat_capacity) - booked).max(0));

        let projection = project_tables(&tables, &active);
        if !projection.unseated.is_empty() {
            warn!(
                venue_id = %venue_id,
                date = %date,
                time = %time,
                unseated = projection.unseated.len(),
                "Slot holds reservations no table can seat"
            );
        }

        Ok(SlotAvailability {
            venue_id,
            date,
            time,
            tables: projection.tables,
            unseated: projection.unseated,
            seats_booked: booked,
            seats_remaining,
        })
    }

    /// Apply a lifecycle transition on behalf of `actor`.
    ///
    /// The write is a compare-and-set on the current status. When it
    /// matches nothing the reservation is re-read to tell a missing
    /// reservation from an illegal transition.
    pub async fn apply(
        &self,
        reservation_id: Uuid,
        transition: Transition,
        actor: &Actor,
    ) -> AppResult<Reservation> {
        let current = self.find_reservation(reservation_id).await?;
        lifecycle::authorize(actor, transition, &current)?;

        let updated = self
            .store
            .transition(reservation_id, transition.sources(), transition.target())
            .await?;

        match updated {
            Some(reservation) => {
                info!(
                    reservation_id = %reservation_id,
                    status = %reservation.status,
                    actor = %actor.user_id,
                    "Reservation status changed"
                );
                Ok(reservation)
            }
            None => {
                let latest = self.find_reservation(reservation_id).await?;
                warn!(
                    reservation_id = %reservation_id,
                    status = %latest.status,
                    transition = transition.verb(),
                    "Illegal reservation transition"
                );
                Err(lifecycle::invalid_transition(latest.status, transition))
            }
        }
    }

    async fn find_reservation(&self, id: Uuid) -> AppResult<Reservation> {
        self.store
            .find_reservation(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tablebook_core::error::ErrorKind;
    use tablebook_core::types::pagination::{PageRequest, PageResponse};
    use tablebook_entity::reservation::{ReservationCounts, ReservationFilter};
    use tablebook_entity::table::{CreateTable, DiningTable};
    use tablebook_entity::venue::{CreateVenue, UpdateVenue, VenueKind};

    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryBookingStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 5, 1).unwrap()
    }

    fn engine(store: Arc<dyn BookingStore>) -> AdmissionEngine {
        AdmissionEngine::new(store, Duration::from_secs(5)).with_clock(Arc::new(FixedClock(today())))
    }

    async fn venue_with_tables(store: &MemoryBookingStore, capacities: &[i32]) -> Venue {
        let venue = store
            .create_venue(&CreateVenue {
                name: "Harbour Grill".to_string(),
                kind: VenueKind::Restaurant,
                address: None,
                phone: None,
                opens_at: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                closes_at: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
                max_party_size: 10,
                seat_capacity: 40,
            })
            .await
            .unwrap();
        for (i, capacity) in capacities.iter().enumerate() {
            store
                .create_table(&CreateTable {
                    venue_id: venue.id,
                    label: format!("T{}", i + 1),
                    capacity: *capacity,
                })
                .await
                .unwrap();
        }
        venue
    }

    fn request(party_size: i64) -> ReservationRequest {
        ReservationRequest {
            customer_name: Some("Grace Hopper".to_string()),
            email: Some("grace@example.com".to_string()),
            phone: Some("555-0199".to_string()),
            date: Some("2030-05-02".to_string()),
            time: Some("19:00".to_string()),
            party_size: Some(party_size),
            notes: None,
            table_id: None,
        }
    }

    fn admin() -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn test_second_request_after_capacity_is_refused() {
        let store = MemoryBookingStore::new();
        let venue = venue_with_tables(&store, &[10]).await;
        let engine = engine(Arc::new(store));

        let first = engine.submit(venue.id, &request(4), None).await.unwrap();
        assert_eq!(first.status, ReservationStatus::Pending);

        let err = engine.submit(venue.id, &request(8), None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.code, Some("SLOT_CONFLICT"));
    }

    #[tokio::test]
    async fn test_cancellation_frees_the_slot() {
        let store = MemoryBookingStore::new();
        let venue = venue_with_tables(&store, &[4]).await;
        let engine = engine(Arc::new(store));
        let owner = Uuid::new_v4();

        let first = engine.submit(venue.id, &request(4), Some(owner)).await.unwrap();
        let actor = Actor {
            user_id: owner,
            is_admin: false,
        };
        engine
            .apply(first.id, Transition::Cancel, &actor)
            .await
            .unwrap();

        let slot = engine
            .availability(venue.id, first.reservation_date, first.reservation_time)
            .await
            .unwrap();
        assert!(slot.tables.iter().all(|t| t.is_available()));
        assert!(engine.submit(venue.id, &request(4), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_terminal_states_refuse_transitions() {
        let store = MemoryBookingStore::new();
        let venue = venue_with_tables(&store, &[]).await;
        let engine = engine(Arc::new(store));

        let r = engine.submit(venue.id, &request(2), None).await.unwrap();
        engine.apply(r.id, Transition::Reject, &admin()).await.unwrap();

        for transition in [Transition::Approve, Transition::Reject, Transition::Cancel] {
            let err = engine.apply(r.id, transition, &admin()).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Conflict);
            assert_eq!(err.code, Some("INVALID_TRANSITION"));
        }
    }

    #[tokio::test]
    async fn test_unknown_reservation_and_venue() {
        let engine = engine(Arc::new(MemoryBookingStore::new()));
        let err = engine
            .apply(Uuid::new_v4(), Transition::Approve, &admin())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = engine
            .submit(Uuid::new_v4(), &request(2), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_pooled_availability() {
        let store = MemoryBookingStore::new();
        let venue = venue_with_tables(&store, &[]).await;
        let engine = engine(Arc::new(store));
        let r = engine.submit(venue.id, &request(6), None).await.unwrap();

        let slot = engine
            .availability(venue.id, r.reservation_date, r.reservation_time)
            .await
            .unwrap();
        assert!(slot.tables.is_empty());
        assert_eq!(slot.seats_booked, 6);
        assert_eq!(slot.seats_remaining, Some(34));
    }

    #[tokio::test]
    async fn test_tables_added_after_pooled_booking_do_not_oversell() {
        let store = Arc::new(MemoryBookingStore::new());
        let venue = venue_with_tables(&store, &[]).await;
        let engine = engine(store.clone());

        let pooled = engine.submit(venue.id, &request(8), None).await.unwrap();
        assert_eq!(pooled.table_id, None);

        store
            .create_table(&CreateTable {
                venue_id: venue.id,
                label: "T1".to_string(),
                capacity: 4,
            })
            .await
            .unwrap();

        let err = engine.submit(venue.id, &request(4), None).await.unwrap_err();
        assert_eq!(err.code, Some("SLOT_CONFLICT"));

        let slot = engine
            .availability(venue.id, pooled.reservation_date, pooled.reservation_time)
            .await
            .unwrap();
        assert_eq!(slot.unseated, vec![pooled.id]);
        assert_eq!(slot.seats_booked, 8);

        engine
            .apply(pooled.id, Transition::Cancel, &admin())
            .await
            .unwrap();
        let seated = engine.submit(venue.id, &request(4), None).await.unwrap();
        assert!(seated.table_id.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_for_last_table() {
        let store = MemoryBookingStore::new();
        let venue = venue_with_tables(&store, &[4]).await;
        let engine = engine(Arc::new(store));
        let venue_id = venue.id;

        let attempts = (0..16).map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.submit(venue_id, &request(2), None).await })
        });
        let results: Vec<AppResult<Reservation>> = futures::future::join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let admitted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(admitted, 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| e.code == Some("SLOT_CONFLICT"))
        );
    }

    /// Store whose every call hangs.
    #[derive(Debug)]
    struct StalledStore;

    async fn stall<T>() -> AppResult<T> {
        std::future::pending().await
    }

    #[async_trait]
    impl BookingStore for StalledStore {
        async fn create_venue(&self, _: &CreateVenue) -> AppResult<Venue> {
            stall().await
        }
        async fn update_venue(&self, _: Uuid, _: &UpdateVenue) -> AppResult<Option<Venue>> {
            stall().await
        }
        async fn delete_venue(&self, _: Uuid) -> AppResult<bool> {
            stall().await
        }
        async fn find_venue(&self, _: Uuid) -> AppResult<Option<Venue>> {
            stall().await
        }
        async fn list_venues(&self, _: &PageRequest) -> AppResult<PageResponse<Venue>> {
            stall().await
        }
        async fn create_table(&self, _: &CreateTable) -> AppResult<DiningTable> {
            stall().await
        }
        async fn delete_table(&self, _: Uuid, _: Uuid) -> AppResult<bool> {
            stall().await
        }
        async fn list_tables(&self, _: Uuid) -> AppResult<Vec<DiningTable>> {
            stall().await
        }
        async fn find_in_slot(
            &self,
            _: Uuid,
            _: NaiveDate,
            _: NaiveTime,
            _: &[ReservationStatus],
        ) -> AppResult<Vec<Reservation>> {
            stall().await
        }
        async fn admit(
            &self,
            _: Uuid,
            _: &ValidatedRequest,
            _: Option<Uuid>,
        ) -> AppResult<Reservation> {
            stall().await
        }
        async fn find_reservation(&self, _: Uuid) -> AppResult<Option<Reservation>> {
            stall().await
        }
        async fn transition(
            &self,
            _: Uuid,
            _: &[ReservationStatus],
            _: ReservationStatus,
        ) -> AppResult<Option<Reservation>> {
            stall().await
        }
        async fn delete_reservation(&self, _: Uuid) -> AppResult<bool> {
            stall().await
        }
        async fn list_reservations(
            &self,
            _: &ReservationFilter,
            _: &PageRequest,
        ) -> AppResult<PageResponse<Reservation>> {
            stall().await
        }
        async fn count_by_status(&self, _: &ReservationFilter) -> AppResult<ReservationCounts> {
            stall().await
        }
        async fn health_check(&self) -> AppResult<bool> {
            stall().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_store_times_out() {
        let engine = AdmissionEngine::new(Arc::new(StalledStore), Duration::from_millis(200));
        let err = engine
            .submit(Uuid::new_v4(), &request(2), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
    }
}
