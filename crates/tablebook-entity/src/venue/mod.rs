//! Venue domain entities.

pub mod hours;
pub mod model;

pub use hours::OperatingHours;
pub use model::{CreateVenue, UpdateVenue, Venue, VenueKind};
