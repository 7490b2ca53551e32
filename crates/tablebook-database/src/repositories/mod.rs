//! Repository implementations for all TableBook entities.

pub mod reservation;
pub mod table;
pub mod user;
pub mod venue;

pub use reservation::ReservationRepository;
pub use table::TableRepository;
pub use user::UserRepository;
pub use venue::VenueRepository;

use tablebook_core::error::{AppError, ErrorKind};

/// Map a sqlx error, turning unique violations into conflicts.
pub(crate) fn map_write_error(e: sqlx::Error, context: &str, duplicate: String) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::conflict(duplicate),
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}
