//! # tablebook-service
//!
//! Business logic service layer for TableBook. Each service wraps the
//! admission engine or the account store to implement one group of
//! application-level use cases, enforcing who may do what.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod reservation;
pub mod user;
pub mod venue;

pub use context::RequestContext;
pub use reservation::{AdminReservationService, ReservationService};
pub use user::{AccountService, MemoryUserStore, UserStore};
pub use venue::{VenueDetail, VenueService};
