//! Route definitions for the TableBook HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! Administrative routes share a guard that requires the admin role.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(venue_routes())
        .merge(reservation_routes())
        .merge(admin_routes(state.clone()))
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
}

/// Auth endpoints: register, login, refresh, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
}

/// Venue browsing, availability, and reservation submission
fn venue_routes() -> Router<AppState> {
    Router::new()
        .route("/venues", get(handlers::venue::list_venues))
        .route("/venues/{id}", get(handlers::venue::get_venue))
        .route(
            "/venues/{id}/availability",
            get(handlers::venue::availability),
        )
        .route(
            "/venues/{id}/reservations",
            post(handlers::reservation::create_reservation),
        )
}

/// Requester self-service
fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/reservations/mine", get(handlers::reservation::list_mine))
        .route(
            "/reservations/{id}",
            get(handlers::reservation::get_reservation),
        )
        .route(
            "/reservations/{id}/cancel",
            post(handlers::reservation::cancel_reservation),
        )
}

/// Admin endpoints
fn admin_routes(state: AppState) -> Router<AppState> {
    use handlers::admin::{reservations, venues};

    Router::new()
        .route("/admin/reservations", get(reservations::list_reservations))
        .route(
            "/admin/reservations/stats",
            get(reservations::reservation_stats),
        )
        .route(
            "/admin/reservations/{id}",
            delete(reservations::delete_reservation),
        )
        .route(
            "/admin/reservations/{id}/status",
            put(reservations::update_status),
        )
        .route("/admin/venues", post(venues::create_venue))
        .route(
            "/admin/venues/{id}",
            put(venues::update_venue).delete(venues::delete_venue),
        )
        .route("/admin/venues/{id}/tables", post(venues::add_table))
        .route(
            "/admin/venues/{id}/tables/{table_id}",
            delete(venues::remove_table),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::rbac::require_admin,
        ))
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
