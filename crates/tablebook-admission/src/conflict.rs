//! Conflict checking and slot assignment.
//!
//! A slot is an exact `(venue, date, time)` triple. Only reservations that
//! hold capacity (`pending` or `approved`) compete for it, and they are
//! considered in creation order: earlier reservations keep their place,
//! later requests are refused once capacity is gone.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_entity::reservation::Reservation;
use tablebook_entity::table::{DiningTable, TableAvailability, TableStatus};
use tablebook_entity::venue::Venue;

use crate::rejection::RejectionReason;

/// Where an admitted request is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotAssignment {
    /// The request takes this table.
    Table(DiningTable),
    /// The venue tracks no tables; seats come from the shared pool.
    Pooled {
        /// Seats still free after this request.
        seats_remaining: i32,
    },
}

impl SlotAssignment {
    /// The assigned table's id, if any.
    pub fn table_id(&self) -> Option<Uuid> {
        match self {
            Self::Table(table) => Some(table.id),
            Self::Pooled { .. } => None,
        }
    }
}

/// Read-time view of one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailability {
    /// Venue.
    pub venue_id: Uuid,
    /// Slot date.
    pub date: NaiveDate,
    /// Slot time.
    pub time: NaiveTime,
    /// Per-table status, ordered by label. Empty for pooled venues.
    pub tables: Vec<TableAvailability>,
    /// Active reservations that no table seats. While any exist the slot
    /// admits nothing further.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unseated: Vec<Uuid>,
    /// Guests held by active reservations.
    pub seats_booked: i64,
    /// Seats left in the shared pool (pooled venues only).
    pub seats_remaining: Option<i64>,
}

/// Table occupancy of one slot.
#[derive(Debug, Clone, Default)]
pub struct SlotProjection {
    /// Per-table status, ordered by label.
    pub tables: Vec<TableAvailability>,
    /// Active reservations left without a table, oldest first.
    pub unseated: Vec<Uuid>,
}

/// Derive each table's status from the slot's active reservations.
///
/// Reservations already bound to a table occupy it. Reservations without
/// a table are then placed, oldest first, on the smallest free table that
/// seats them; those that fit nowhere are reported as `unseated`. This
/// happens when a pooled venue gains tables or a table is removed.
pub fn project_tables(tables: &[DiningTable], active: &[Reservation]) -> SlotProjection {
    let mut occupied: HashMap<Uuid, Uuid> = HashMap::new();
    let mut unseated = Vec::new();

    let mut ordered: Vec<&Reservation> = active
        .iter()
        .filter(|r| r.status.holds_capacity())
        .collect();
    ordered.sort_by_key(|r| r.created_at);

    for reservation in &ordered {
        if let Some(table_id) = reservation.table_id {
            if tables.iter().any(|t| t.id == table_id) {
                occupied.entry(table_id).or_insert(reservation.id);
            }
        }
    }

    let mut by_size: Vec<&DiningTable> = tables.iter().collect();
    by_size.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.label.cmp(&b.label)));

    // Links to tables outside the venue count as untabled.
    let untabled = ordered
        .iter()
        .filter(|r| r.table_id.is_none_or(|id| !tables.iter().any(|t| t.id == id)));
    for reservation in untabled {
        let spot = by_size
            .iter()
            .find(|t| t.capacity >= reservation.party_size && !occupied.contains_key(&t.id));
        match spot {
            Some(table) => {
                occupied.insert(table.id, reservation.id);
            }
            None => unseated.push(reservation.id),
        }
    }

    let mut projection: Vec<TableAvailability> = tables
        .iter()
        .map(|table| {
            let reservation_id = occupied.get(&table.id).copied();
            TableAvailability {
                table: table.clone(),
                status: if reservation_id.is_some() {
                    TableStatus::Booked
                } else {
                    TableStatus::Available
                },
                reservation_id,
            }
        })
        .collect();
    projection.sort_by(|a, b| a.table.label.cmp(&b.table.label));

    SlotProjection {
        tables: projection,
        unseated,
    }
}

/// Guests held by active reservations in the slot.
pub fn seats_booked(active: &[Reservation]) -> i64 {
    active
        .iter()
        .filter(|r| r.status.holds_capacity())
        .map(|r| i64::from(r.party_size))
        .sum()
}

/// Decide where a new party of `party_size` fits in a slot.
///
/// `active` must hold the slot's current `pending`/`approved` reservations.
/// Venues with tables assign one table; venues without tables draw from
/// `seat_capacity`. A `requested_table` must belong to the venue, seat the
/// party, and be free. A table-mode slot holding unseated reservations is
/// already over capacity and refuses every request.
pub fn plan_admission(
    venue: &Venue,
    tables: &[DiningTable],
    active: &[Reservation],
    date: NaiveDate,
    time: NaiveTime,
    party_size: i32,
    requested_table: Option<Uuid>,
) -> AppResult<SlotAssignment> {
    let conflict = || RejectionReason::SlotConflict {
        date,
        time,
        party_size,
    };

    if tables.is_empty() {
        if let Some(table_id) = requested_table {
            return Err(AppError::not_found(format!(
                "Table {table_id} not found in venue {}",
                venue.id
            )));
        }
        let remaining = i64::from(venue.seat_capacity) - seats_booked(active);
        if i64::from(party_size) > remaining {
            return Err(conflict().into());
        }
        return Ok(SlotAssignment::Pooled {
            seats_remaining: (remaining - i64::from(party_size)) as i32,
        });
    }

    let projection = project_tables(tables, active);

    if let Some(table_id) = requested_table {
        let slot = projection
            .tables
            .iter()
            .find(|a| a.table.id == table_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Table {table_id} not found in venue {}", venue.id))
            })?;
        if slot.table.capacity < party_size {
            return Err(RejectionReason::TableCapacityExceeded {
                table_id,
                capacity: slot.table.capacity,
                party_size,
            }
            .into());
        }
        if !slot.is_available() || !projection.unseated.is_empty() {
            return Err(conflict().into());
        }
        return Ok(SlotAssignment::Table(slot.table.clone()));
    }

    if !projection.unseated.is_empty() {
        return Err(conflict().into());
    }

    projection
        .tables
        .into_iter()
        .filter(|a| a.is_available() && a.table.capacity >= party_size)
        .min_by(|a, b| {
            a.table
                .capacity
                .cmp(&b.table.capacity)
                .then_with(|| a.table.label.cmp(&b.table.label))
        })
        .map(|a| SlotAssignment::Table(a.table))
        .ok_or_else(|| conflict().into())
}
