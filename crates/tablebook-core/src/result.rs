//! Convenience result type alias for TableBook.

use crate::error::AppError;

/// A specialized `Result` type for TableBook operations.
pub type AppResult<T> = Result<T, AppError>;
