//! Health check handlers.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use tablebook_core::config::StoreBackend;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let reachable = match state.engine.store().health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "Booking store health check failed");
            false
        }
    };

    let backend = match state.config.database.backend {
        StoreBackend::Postgres => "postgres",
        StoreBackend::Memory => "memory",
    };

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: if reachable { "ok" } else { "degraded" }.to_string(),
        backend: backend.to_string(),
        store: if reachable { "connected" } else { "unavailable" }.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}
