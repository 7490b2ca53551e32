//! Venue and table management.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use tablebook_admission::AdmissionEngine;
use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::table::{CreateTable, DiningTable};
use tablebook_entity::venue::{CreateVenue, UpdateVenue, Venue};

use crate::context::RequestContext;

/// A venue together with its tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueDetail {
    /// The venue.
    #[serde(flatten)]
    pub venue: Venue,
    /// Its tables, ordered by label. Empty for pooled venues.
    pub tables: Vec<DiningTable>,
}

/// Handles venue browsing and administrative venue/table changes.
#[derive(Debug, Clone)]
pub struct VenueService {
    engine: AdmissionEngine,
}

impl VenueService {
    /// Creates a new venue service.
    pub fn new(engine: AdmissionEngine) -> Self {
        Self { engine }
    }

    /// List venues by name.
    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Venue>> {
        self.engine.store().list_venues(page).await
    }

    /// A venue with its tables.
    pub async fn get(&self, id: Uuid) -> AppResult<VenueDetail> {
        let venue = self.engine.venue(id).await?;
        let tables = self.engine.store().list_tables(id).await?;
        Ok(VenueDetail { venue, tables })
    }

    /// Create a venue.
    pub async fn create(&self, ctx: &RequestContext, data: &CreateVenue) -> AppResult<Venue> {
        ctx.require_admin()?;
        data.validate()?;
        let venue = self.engine.store().create_venue(data).await?;
        info!(venue_id = %venue.id, admin = %ctx.user_id, "Venue created");
        Ok(venue)
    }

    /// Apply a partial update to a venue.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        update: &UpdateVenue,
    ) -> AppResult<Venue> {
        ctx.require_admin()?;
        // The store re-checks the merged row when it writes.
        let mut preview = self.engine.venue(id).await?;
        preview.apply(update)?;
        let venue = self
            .engine
            .store()
            .update_venue(id, update)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Venue {id} not found")))?;
        info!(venue_id = %id, admin = %ctx.user_id, "Venue updated");
        Ok(venue)
    }

    /// Delete a venue with its tables and reservations.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        ctx.require_admin()?;
        if !self.engine.store().delete_venue(id).await? {
            return Err(AppError::not_found(format!("Venue {id} not found")));
        }
        info!(venue_id = %id, admin = %ctx.user_id, "Venue deleted");
        Ok(())
    }

    /// Add a table to a venue.
    pub async fn add_table(
        &self,
        ctx: &RequestContext,
        venue_id: Uuid,
        label: &str,
        capacity: i32,
    ) -> AppResult<DiningTable> {
        ctx.require_admin()?;
        let data = CreateTable {
            venue_id,
            label: label.trim().to_string(),
            capacity,
        };
        data.validate()?;
        let table = self.engine.store().create_table(&data).await?;
        info!(venue_id = %venue_id, table_id = %table.id, "Table added");
        Ok(table)
    }

    /// Remove a table from a venue.
    pub async fn remove_table(
        &self,
        ctx: &RequestContext,
        venue_id: Uuid,
        table_id: Uuid,
    ) -> AppResult<()> {
        ctx.require_admin()?;
        if !self.engine.store().delete_table(venue_id, table_id).await? {
            return Err(AppError::not_found(format!(
                "Table {table_id} not found in venue {venue_id}"
            )));
        }
        info!(venue_id = %venue_id, table_id = %table_id, "Table removed");
        Ok(())
    }
}
