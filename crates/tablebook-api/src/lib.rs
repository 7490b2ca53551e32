//! # tablebook-api
//!
//! HTTP API layer for TableBook built on Axum.
//!
//! Provides the REST endpoints for reservation submission, venue browsing,
//! account management, and administration, together with middleware
//! (logging, CORS, compression, body limits), extractors, DTOs, and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
