//! In-memory booking store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::reservation::{
    Reservation, ReservationCounts, ReservationFilter, ReservationStatus,
};
use tablebook_entity::table::{CreateTable, DiningTable};
use tablebook_entity::venue::{CreateVenue, UpdateVenue, Venue};

use super::BookingStore;
use crate::conflict::plan_admission;
use crate::validator::ValidatedRequest;

/// Internal state for the memory-based store.
#[derive(Debug, Default)]
struct InnerState {
    venues: HashMap<Uuid, Venue>,
    tables: HashMap<Uuid, DiningTable>,
    /// Kept in insertion order, which is creation order.
    reservations: Vec<Reservation>,
}

impl InnerState {
    fn tables_of(&self, venue_id: Uuid) -> Vec<DiningTable> {
        let mut tables: Vec<DiningTable> = self
            .tables
            .values()
            .filter(|t| t.venue_id == venue_id)
            .cloned()
            .collect();
        tables.sort_by(|a, b| a.label.cmp(&b.label));
        tables
    }

    fn in_slot(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: &[ReservationStatus],
    ) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| {
                r.venue_id == venue_id
                    && r.reservation_date == date
                    && r.reservation_time == time
                    && !exclude.contains(&r.status)
            })
            .cloned()
            .collect()
    }
}

/// In-memory booking store.
///
/// One mutex guards all state, so every admission is serialized. Suitable
/// for single-node deployments, development, and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryBookingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: serde::Serialize>(items: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(items, page.page, page.page_size, total)
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn create_venue(&self, data: &CreateVenue) -> AppResult<Venue> {
        let now = Utc::now();
        let venue = Venue {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            kind: data.kind,
            address: data.address.clone(),
            phone: data.phone.clone(),
            opens_at: data.opens_at,
            closes_at: data.closes_at,
            max_party_size: data.max_party_size,
            seat_capacity: data.seat_capacity,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .await
            .venues
            .insert(venue.id, venue.clone());
        info!(venue_id = %venue.id, name = %venue.name, "Venue created");
        Ok(venue)
    }

    async fn update_venue(&self, id: Uuid, update: &UpdateVenue) -> AppResult<Option<Venue>> {
        let mut state = self.state.lock().await;
        let Some(stored) = state.venues.get_mut(&id) else {
            return Ok(None);
        };
        let mut next = stored.clone();
        next.apply(update)?;
        next.updated_at = Utc::now();
        *stored = next;
        Ok(Some(stored.clone()))
    }

    async fn delete_venue(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if state.venues.remove(&id).is_none() {
            return Ok(false);
        }
        state.tables.retain(|_, t| t.venue_id != id);
        state.reservations.retain(|r| r.venue_id != id);
        Ok(true)
    }

    async fn find_venue(&self, id: Uuid) -> AppResult<Option<Venue>> {
        Ok(self.state.lock().await.venues.get(&id).cloned())
    }

    async fn list_venues(&self, page: &PageRequest) -> AppResult<PageResponse<Venue>> {
        let state = self.state.lock().await;
        let mut venues: Vec<Venue> = state.venues.values().cloned().collect();
        venues.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(paginate(venues, page))
    }

    async fn create_table(&self, data: &CreateTable) -> AppResult<DiningTable> {
        let mut state = self.state.lock().await;
        if !state.venues.contains_key(&data.venue_id) {
            return Err(AppError::not_found(format!(
                "Venue {} not found",
                data.venue_id
            )));
        }
        if state
            .tables
            .values()
            .any(|t| t.venue_id == data.venue_id && t.label == data.label)
        {
            return Err(AppError::conflict(format!(
                "Table '{}' already exists in this venue",
                data.label
            )));
        }
        let table = DiningTable {
            id: Uuid::new_v4(),
            venue_id: data.venue_id,
            label: data.label.clone(),
            capacity: data.capacity,
            created_at: Utc::now(),
        };
        state.tables.insert(table.id, table.clone());
        Ok(table)
    }

    async fn delete_table(&self, venue_id: Uuid, table_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.tables.get(&table_id) {
            Some(t) if t.venue_id == venue_id => {}
            _ => return Ok(false),
        }
        state.tables.remove(&table_id);
        for reservation in state
            .reservations
            .iter_mut()
            .filter(|r| r.table_id == Some(table_id))
        {
            reservation.table_id = None;
        }
        Ok(true)
    }

    async fn list_tables(&self, venue_id: Uuid) -> AppResult<Vec<DiningTable>> {
        Ok(self.state.lock().await.tables_of(venue_id))
    }

    async fn find_in_slot(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: &[ReservationStatus],
    ) -> AppResult<Vec<Reservation>> {
        Ok(self
            .state
            .lock()
            .await
            .in_slot(venue_id, date, time, exclude))
    }

    async fn admit(
        &self,
        venue_id: Uuid,
        request: &ValidatedRequest,
        user_id: Option<Uuid>,
    ) -> AppResult<Reservation> {
        let mut state = self.state.lock().await;

        let venue = state
            .venues
            .get(&venue_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Venue {venue_id} not found")))?;
        let tables = state.tables_of(venue_id);
        let active = state.in_slot(
            venue_id,
            request.date,
            request.time,
            &ReservationStatus::RELEASED,
        );

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
        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            venue_id: data.venue_id,
            table_id: data.table_id,
            user_id: data.user_id,
            customer_name: data.customer_name,
            email: data.email,
            phone: data.phone,
            reservation_date: data.reservation_date,
            reservation_time: data.reservation_time,
            party_size: data.party_size,
            notes: data.notes,
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.reservations.push(reservation.clone());
        debug!(reservation_id = %reservation.id, "Reservation stored");
        Ok(reservation)
    }

    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        Ok(self
            .state
            .lock()
            .await
            .reservations
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn transition(
        &self,
        id: Uuid,
        from: &[ReservationStatus],
        to: ReservationStatus,
    ) -> AppResult<Option<Reservation>> {
        let mut state = self.state.lock().await;
        let Some(reservation) = state
            .reservations
            .iter_mut()
            .find(|r| r.id == id && from.contains(&r.status))
        else {
            return Ok(None);
        };
        reservation.status = to;
        reservation.updated_at = Utc::now();
        Ok(Some(reservation.clone()))
    }

    async fn delete_reservation(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.reservations.len();
        state.reservations.retain(|r| r.id != id);
        Ok(state.reservations.len() != before)
    }

    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let state = self.state.lock().await;
        let matching: Vec<Reservation> = state
            .reservations
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        Ok(paginate(matching, page))
    }

    async fn count_by_status(&self, filter: &ReservationFilter) -> AppResult<ReservationCounts> {
        let state = self.state.lock().await;
        let mut counts = ReservationCounts::default();
        for reservation in state.reservations.iter().filter(|r| filter.matches(r)) {
            counts.add(reservation.status, 1);
        }
        Ok(counts)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use tablebook_core::error::ErrorKind;
    use tablebook_entity::venue::VenueKind;

    use super::*;

    fn bistro() -> CreateVenue {
        CreateVenue {
            name: "Bistro".to_string(),
            kind: VenueKind::Restaurant,
            address: None,
            phone: None,
            opens_at: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            closes_at: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            max_party_size: 10,
            seat_capacity: 12,
        }
    }

    fn request(party_size: i32) -> ValidatedRequest {
        ValidatedRequest {
            customer_name: "Guest".to_string(),
            email: "guest@example.com".to_string(),
            phone: "555-0100".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 5, 2).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            party_size,
            notes: None,
            table_id: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_table_label() {
        let store = MemoryBookingStore::new();
        let venue = store.create_venue(&bistro()).await.unwrap();
        let table = CreateTable {
            venue_id: venue.id,
            label: "T1".to_string(),
            capacity: 4,
        };
        store.create_table(&table).await.unwrap();
        assert!(store.create_table(&table).await.is_err());
    }

    #[tokio::test]
    async fn test_cas_transition() {
        let store = MemoryBookingStore::new();
        let venue = store.create_venue(&bistro()).await.unwrap();
        let r = store.admit(venue.id, &request(2), None).await.unwrap();

        let approved = store
            .transition(r.id, &[ReservationStatus::Pending], ReservationStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.unwrap().status, ReservationStatus::Approved);

        let again = store
            .transition(r.id, &[ReservationStatus::Pending], ReservationStatus::Rejected)
            .await
            .unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_deleting_table_unlinks_reservations() {
        let store = MemoryBookingStore::new();
        let venue = store.create_venue(&bistro()).await.unwrap();
        let table = store
            .create_table(&CreateTable {
                venue_id: venue.id,
                label: "T1".to_string(),
                capacity: 4,
            })
            .await
            .unwrap();
        let r = store.admit(venue.id, &request(2), None).await.unwrap();
        assert_eq!(r.table_id, Some(table.id));

        assert!(store.delete_table(venue.id, table.id).await.unwrap());
        let r = store.find_reservation(r.id).await.unwrap().unwrap();
        assert!(r.table_id.is_none());
    }

    #[tokio::test]
    async fn test_counts_and_listing() {
        let store = MemoryBookingStore::new();
        let venue = store.create_venue(&bistro()).await.unwrap();
        let first = store.admit(venue.id, &request(2), None).await.unwrap();
        let second = store.admit(venue.id, &request(3), None).await.unwrap();
        store
            .transition(first.id, &[ReservationStatus::Pending], ReservationStatus::Cancelled)
            .await
            .unwrap();

        let counts = store
            .count_by_status(&ReservationFilter::default())
            .await
            .unwrap();
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.total, 2);

        let page = store
            .list_reservations(&ReservationFilter::default(), &PageRequest::new(1, 1))
            .await
            .unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.items[0].id, second.id);
        assert!(page.has_next);
    }

    #[tokio::test]
    async fn test_concurrent_partial_updates_keep_both_fields() {
        let store = Arc::new(MemoryBookingStore::new());
        let venue = store.create_venue(&bistro()).await.unwrap();

        let rename = UpdateVenue {
            name: Some("Bistro Nord".to_string()),
            ..Default::default()
        };
        let resize = UpdateVenue {
            seat_capacity: Some(30),
            ..Default::default()
        };
        let (a, b) = tokio::join!(
            store.update_venue(venue.id, &rename),
            store.update_venue(venue.id, &resize),
        );
        assert!(a.unwrap().is_some());
        assert!(b.unwrap().is_some());

        let stored = store.find_venue(venue.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Bistro Nord");
        assert_eq!(stored.seat_capacity, 30);
        assert_eq!(stored.max_party_size, 10);
    }

    #[tokio::test]
    async fn test_partial_update_checks_merged_hours() {
        let store = MemoryBookingStore::new();
        let venue = store.create_venue(&bistro()).await.unwrap();
        let update = UpdateVenue {
            closes_at: NaiveTime::from_hms_opt(9, 0, 0),
            ..Default::default()
        };
        let err = store.update_venue(venue.id, &update).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let stored = store.find_venue(venue.id).await.unwrap().unwrap();
        assert_eq!(stored.closes_at, venue.closes_at);
        assert!(
            store
                .update_venue(Uuid::new_v4(), &UpdateVenue::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
