//! HTTP-level integration tests against the in-memory backend.

mod helpers;

mod admin_test;
mod auth_test;
mod reservation_test;
mod venue_test;
