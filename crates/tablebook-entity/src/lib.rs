//! # tablebook-entity
//!
//! Domain entity models for TableBook. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities additionally derive `sqlx::FromRow`.

pub mod reservation;
pub mod table;
pub mod user;
pub mod venue;
