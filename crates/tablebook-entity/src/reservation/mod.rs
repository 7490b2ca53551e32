//! Reservation domain entities.

pub mod model;
pub mod query;
pub mod status;

pub use model::{NewReservation, Reservation};
pub use query::{ReservationCounts, ReservationFilter};
pub use status::ReservationStatus;
