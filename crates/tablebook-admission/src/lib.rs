//! # tablebook-admission
//!
//! The reservation admission engine. A request is admitted only when it
//! passes the [`validator`] and the [`conflict`] checker, and is then
//! persisted as `pending` through a [`store::BookingStore`]. Later status
//! changes go through the [`lifecycle`] state machine as compare-and-set
//! writes.

pub mod clock;
pub mod conflict;
pub mod engine;
pub mod lifecycle;
pub mod rejection;
pub mod store;
pub mod validator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use conflict::{SlotAssignment, SlotAvailability};
pub use engine::AdmissionEngine;
pub use lifecycle::{Actor, Transition};
pub use rejection::RejectionReason;
pub use store::BookingStore;
pub use validator::{ReservationRequest, ValidatedRequest};
