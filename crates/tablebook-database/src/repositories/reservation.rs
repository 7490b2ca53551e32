//! Reservation repository implementation.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::reservation::{
    NewReservation, Reservation, ReservationCounts, ReservationFilter, ReservationStatus,
};

/// Repository for reservation queries and writes.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

fn status_names(statuses: &[ReservationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ReservationFilter) {
    builder.push(" WHERE TRUE");
    if let Some(venue_id) = filter.venue_id {
        builder.push(" AND venue_id = ").push_bind(venue_id);
    }
    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND reservation_date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND reservation_date <= ").push_bind(to);
    }
}

impl ReservationRepository {
    /// Create a new reservation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a reservation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find reservation", e)
            })
    }

    /// Reservations in a slot whose status is not in `exclude`, oldest first.
    pub async fn find_in_slot(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: &[ReservationStatus],
    ) -> AppResult<Vec<Reservation>> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        Self::find_in_slot_in(&mut conn, venue_id, date, time, exclude).await
    }

    /// Slot query on an existing connection.
    pub async fn find_in_slot_in(
        conn: &mut PgConnection,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: &[ReservationStatus],
    ) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations \
             WHERE venue_id = $1 AND reservation_date = $2 AND reservation_time = $3 \
             AND NOT (status::text = ANY($4)) \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(venue_id)
        .bind(date)
        .bind(time)
        .bind(status_names(exclude))
        .fetch_all(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load slot reservations", e)
        })
    }

    /// Take the transaction-scoped advisory lock for a slot.
    pub async fn lock_slot(
        conn: &mut PgConnection,
        venue_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<()> {
        let key = format!("{venue_id}:{date}:{}", time.format("%H:%M"));
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(key)
            .execute(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock slot", e))?;
        Ok(())
    }

    /// Insert a `pending` reservation on an existing connection.
    pub async fn insert_in(conn: &mut PgConnection, data: &NewReservation) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (venue_id, table_id, user_id, customer_name, email, phone, \
             reservation_date, reservation_time, party_size, notes, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending') RETURNING *",
        )
        .bind(data.venue_id)
        .bind(data.table_id)
        .bind(data.user_id)
        .bind(&data.customer_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.reservation_date)
        .bind(data.reservation_time)
        .bind(data.party_size)
        .bind(&data.notes)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert reservation", e))
    }

    /// Compare-and-set the status. `None` if no row matched.
    pub async fn transition(
        &self,
        id: Uuid,
        from: &[ReservationStatus],
        to: ReservationStatus,
    ) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status::text = ANY($3) RETURNING *",
        )
        .bind(id)
        .bind(to)
        .bind(status_names(from))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update reservation status", e)
        })
    }

    /// Permanently delete a reservation.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete reservation", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Filtered listing, newest first.
    pub async fn find_filtered(
        &self,
        filter: &ReservationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM reservations");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count reservations", e)
            })?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM reservations");
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let reservations = select
            .build_query_as::<Reservation>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list reservations", e)
            })?;

        Ok(PageResponse::new(
            reservations,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count reservations per status.
    pub async fn count_by_status(&self, filter: &ReservationFilter) -> AppResult<ReservationCounts> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT status, COUNT(*) FROM reservations");
        push_filter(&mut builder, filter);
        builder.push(" GROUP BY status");

        let rows: Vec<(ReservationStatus, i64)> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count reservations", e)
            })?;

        let mut counts = ReservationCounts::default();
        for (status, n) in rows {
            counts.add(status, n as u64);
        }
        Ok(counts)
    }
}
