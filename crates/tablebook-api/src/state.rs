//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use tablebook_admission::AdmissionEngine;
use tablebook_auth::jwt::JwtDecoder;
use tablebook_core::config::AppConfig;
use tablebook_service::{
    AccountService, AdminReservationService, ReservationService, VenueService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// Services are cheap to clone; everything else is `Arc`-wrapped.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: Instant,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Admission ────────────────────────────────────────────
    /// Admission engine over the configured booking store
    pub engine: AdmissionEngine,

    // ── Services ─────────────────────────────────────────────
    /// Account service
    pub account_service: AccountService,
    /// Venue service
    pub venue_service: VenueService,
    /// Requester reservation service
    pub reservation_service: ReservationService,
    /// Admin reservation service
    pub admin_reservation_service: AdminReservationService,
}

impl AppState {
    /// Wire the services around an admission engine and account service.
    pub fn new(
        config: AppConfig,
        engine: AdmissionEngine,
        account_service: AccountService,
        jwt_decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            jwt_decoder,
            venue_service: VenueService::new(engine.clone()),
            reservation_service: ReservationService::new(engine.clone()),
            admin_reservation_service: AdminReservationService::new(engine.clone()),
            engine,
            account_service,
        }
    }
}
