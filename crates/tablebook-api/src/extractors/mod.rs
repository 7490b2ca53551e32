//! Custom Axum extractors.
//!
//! Every rejection is an [`ApiError`](crate::error::ApiError), so malformed
//! input gets the same JSON error body as any other failure.

pub mod auth;
pub mod json;
pub mod pagination;
pub mod path;
pub mod query;

pub use auth::AuthUser;
pub use json::ValidatedJson;
pub use pagination::PaginationParams;
pub use path::ApiPath;
pub use query::ApiQuery;
