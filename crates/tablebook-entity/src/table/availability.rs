//! Read-time projection of table status for a single slot.
//!
//! Table status is never stored. It is derived from the active
//! reservations of a (venue, date, time) slot every time it is requested.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::DiningTable;

/// Derived status of a table within one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    /// No active reservation holds the table.
    Available,
    /// An active reservation holds the table.
    Booked,
}

/// A table together with its derived status for one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAvailability {
    /// The table.
    pub table: DiningTable,
    /// Derived status.
    pub status: TableStatus,
    /// Reservation currently holding the table, if booked.
    pub reservation_id: Option<Uuid>,
}

impl TableAvailability {
    /// Whether the table is free in this slot.
    pub fn is_available(&self) -> bool {
        self.status == TableStatus::Available
    }
}
