//! Dining table domain entities.

pub mod availability;
pub mod model;

pub use availability::{TableAvailability, TableStatus};
pub use model::{CreateTable, DiningTable};
