//! Deadline enforcement for store calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing::warn;
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
use crate::validator::ValidatedRequest;

/// Run `call` with an upper bound of `limit`.
///
/// The future is dropped on expiry, which rolls back any open transaction.
pub async fn bounded<T>(
    limit: Duration,
    operation: &'static str,
    call: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "Store call timed out"
            );
            Err(AppError::timeout(format!(
                "Store operation '{operation}' did not complete within {} ms",
                limit.as_millis()
            ))
            .with_code("STORE_TIMEOUT"))
        }
    }
}

/// Wraps a store so that every call is bounded by the same deadline.
#[derive(Debug, Clone)]
pub struct TimeoutStore {
    inner: Arc<dyn BookingStore>,
    limit: Duration,
}

impl TimeoutStore {
    /// Bound every call on `inner` by `limit`.
    pub fn new(inner: Arc<dyn BookingStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    /// The configured deadline.
    pub fn limit(&self) -> Duration {
        self.limit
    }
}

#[async_trait]
impl BookingStore for TimeoutStore {
    async fn create_venue(&self, data: &CreateVenue) -> AppResult<Venue> {
        bounded(self.limit, "create_venue", self.inner.create_venue(data)).await
    }

    async fn update_venue(&self, id: Uuid, update: &UpdateVenue) -> AppResult<Option<Venue>> {
        bounded(self.limit, "update_venue", self.inner.update_venue(id, update)).await
    }

    async fn delete_venue(&self, id: Uuid) -> AppResult<bool> {
        bounded(self.limit, "delete_venue", self.inner.delete_venue(id)).await
    }

    async fn find_venue(&self, id: Uuid) -> AppResult<Option<Venue>> {
        bounded(self.limit, "find_venue", self.inner.find_venue(id)).await
    }

    async fn list_venues(&self, page: &PageRequest) -> AppResult<PageResponse<Venue>> {
        bounded(self.limit, "list_venues", self.inner.list_venues(page)).await
    }

    async fn create_table(&self, data: &CreateTable) -> AppResult<DiningTable> {
        bounded(self.limit, "create_table", self.inner.create_table(data)).await
    }

    async fn delete_table(&self, venue_id: Uuid, table_id: Uuid) -> AppResult<bool> {
        bounded(
            self.limit,
            "delete_table",
            self.inner.delete_table(venue_id, table_id),
        )
        .await
    }

    async fn list_tables(&self, venue_id: Uuid) -> AppResult<Vec<DiningTable>> {
        bounded(self.limit, "list_tables", self.inner.list_tables(venue_id)).await
    }

    async fn find_in_slot(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: &[ReservationStatus],
    ) -> AppResult<Vec<Reservation>> {
        bounded(
            self.limit,
            "find_in_slot",
            self.inner.find_in_slot(venue_id, date, time, exclude),
        )
        .await
    }

    async fn admit(
        &self,
        venue_id: Uuid,
        request: &ValidatedRequest,
        user_id: Option<Uuid>,
    ) -> AppResult<Reservation> {
        bounded(
            self.limit,
            "admit",
            self.inner.admit(venue_id, request, user_id),
        )
        .await
    }

    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        bounded(self.limit, "find_reservation", self.inner.find_reservation(id)).await
    }

    async fn transition(
        &self,
        id: Uuid,
        from: &[ReservationStatus],
        to: ReservationStatus,
    ) -> AppResult<Option<Reservation>> {
        bounded(self.limit, "transition", self.inner.transition(id, from, to)).await
    }

    async fn delete_reservation(&self, id: Uuid) -> AppResult<bool> {
        bounded(
            self.limit,
            "delete_reservation",
            self.inner.delete_reservation(id),
        )
        .await
    }

    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        bounded(
            self.limit,
            "list_reservations",
            self.inner.list_reservations(filter, page),
        )
        .await
    }

    async fn count_by_status(&self, filter: &ReservationFilter) -> AppResult<ReservationCounts> {
        bounded(self.limit, "count_by_status", self.inner.count_by_status(filter)).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        bounded(self.limit, "health_check", self.inner.health_check()).await
    }
}

#[cfg(test)]
mod tests {
    use tablebook_core::error::ErrorKind;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, AppError>(())
        };
        let err = bounded(Duration::from_millis(50), "slow", slow)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(err.code, Some("STORE_TIMEOUT"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_passes_through_results() {
        let value = bounded(Duration::from_secs(1), "fast", async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        let err = bounded(Duration::from_secs(1), "failing", async {
            Err::<(), _>(AppError::not_found("gone"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
