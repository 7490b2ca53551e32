//! Venue repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::venue::{CreateVenue, UpdateVenue, Venue};

/// Repository for venue CRUD operations.
#[derive(Debug, Clone)]
pub struct VenueRepository {
    pool: PgPool,
}

impl VenueRepository {
    /// Create a new venue repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a venue by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Venue>> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find venue", e))
    }

    /// Find a venue and hold a share lock on it until the transaction ends.
    pub async fn find_for_share(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Venue>> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock venue", e))
    }

    /// List venues ordered by name.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Venue>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count venues", e))?;

        let venues = sqlx::query_as::<_, Venue>(
            "SELECT * FROM venues ORDER BY name ASC, id ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list venues", e))?;

        Ok(PageResponse::new(
            venues,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a new venue.
    pub async fn create(&self, data: &CreateVenue) -> AppResult<Venue> {
        sqlx::query_as::<_, Venue>(
            "INSERT INTO venues (name, kind, address, phone, opens_at, closes_at, max_party_size, seat_capacity) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.kind)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(data.opens_at)
        .bind(data.closes_at)
        .bind(data.max_party_size)
        .bind(data.seat_capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create venue", e))
    }

    /// Apply a partial update in a single statement.
    ///
    /// Unset fields keep their stored value, so concurrent updates to
    /// different fields do not overwrite each other. The table's CHECK
    /// constraints guard the merged row.
    pub async fn update(&self, id: Uuid, update: &UpdateVenue) -> AppResult<Option<Venue>> {
        sqlx::query_as::<_, Venue>(
            "UPDATE venues SET \
               name = COALESCE($2, name), \
               kind = COALESCE($3, kind), \
               address = CASE WHEN $4 THEN $5 ELSE address END, \
               phone = CASE WHEN $6 THEN $7 ELSE phone END, \
               opens_at = COALESCE($8, opens_at), \
               closes_at = COALESCE($9, closes_at), \
               max_party_size = COALESCE($10, max_party_size), \
               seat_capacity = COALESCE($11, seat_capacity), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.name)
        .bind(update.kind)
        .bind(update.address.is_some())
        .bind(update.address.clone().flatten())
        .bind(update.phone.is_some())
        .bind(update.phone.clone().flatten())
        .bind(update.opens_at)
        .bind(update.closes_at)
        .bind(update.max_party_size)
        .bind(update.seat_capacity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_check_violation() => AppError::validation(format!(
                "Venue update violates {}",
                db.constraint().unwrap_or("a venue constraint")
            )),
            _ => AppError::with_source(ErrorKind::Database, "Failed to update venue", e),
        })
    }

    /// Delete a venue. Tables and reservations cascade.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete venue", e))?;
        Ok(result.rows_affected() > 0)
    }
}
