//! Dining table repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_entity::table::{CreateTable, DiningTable};

use super::map_write_error;

/// Repository for dining tables.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: PgPool,
}

impl TableRepository {
    /// Create a new table repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A venue's tables ordered by label.
    pub async fn find_by_venue(&self, venue_id: Uuid) -> AppResult<Vec<DiningTable>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e))?;
        Self::find_by_venue_in(&mut conn, venue_id).await
    }

    /// A venue's tables, read on an existing connection.
    pub async fn find_by_venue_in(
        conn: &mut PgConnection,
        venue_id: Uuid,
    ) -> AppResult<Vec<DiningTable>> {
        sqlx::query_as::<_, DiningTable>(
            "SELECT * FROM dining_tables WHERE venue_id = $1 ORDER BY label ASC",
        )
        .bind(venue_id)
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tables", e))
    }

    /// Add a table to a venue.
    pub async fn create(&self, data: &CreateTable) -> AppResult<DiningTable> {
        sqlx::query_as::<_, DiningTable>(
            "INSERT INTO dining_tables (venue_id, label, capacity) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.venue_id)
        .bind(&data.label)
        .bind(data.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "Failed to create table",
                format!("Table '{}' already exists in this venue", data.label),
            )
        })
    }

    /// Remove a table. Reservations referencing it lose the link.
    pub async fn delete(&self, venue_id: Uuid, table_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM dining_tables WHERE id = $1 AND venue_id = $2")
            .bind(table_id)
            .bind(venue_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete table", e))?;
        Ok(result.rows_affected() > 0)
    }
}
