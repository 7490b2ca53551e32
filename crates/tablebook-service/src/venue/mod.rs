//! Venue catalogue and administration.

pub mod service;

pub use service::{VenueDetail, VenueService};
