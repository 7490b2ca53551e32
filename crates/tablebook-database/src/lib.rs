//! # tablebook-database
//!
//! PostgreSQL connection management, repositories for every TableBook
//! entity, and [`PgBookingStore`], the PostgreSQL implementation of the
//! admission engine's booking store.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::PgBookingStore;
