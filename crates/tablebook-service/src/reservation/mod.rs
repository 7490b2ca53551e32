//! Requester and administrator reservation services.

pub mod admin;
pub mod service;

pub use admin::AdminReservationService;
pub use service::ReservationService;
