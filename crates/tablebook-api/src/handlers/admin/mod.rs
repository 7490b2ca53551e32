//! Administrative handlers. Every route here sits behind the admin guard.

pub mod reservations;
pub mod venues;
