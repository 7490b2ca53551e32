//! Application builder: wires router, middleware, and state into an Axum app.

use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use tablebook_admission::AdmissionEngine;
use tablebook_admission::store::{BookingStore, MemoryBookingStore};
use tablebook_auth::jwt::{JwtDecoder, JwtEncoder};
use tablebook_auth::password::{PasswordHasher, PasswordValidator};
use tablebook_core::config::{AppConfig, ServerConfig, StoreBackend};
use tablebook_core::error::{AppError, ErrorKind};
use tablebook_database::repositories::UserRepository;
use tablebook_database::{DatabasePool, PgBookingStore};
use tablebook_service::{AccountService, MemoryUserStore, UserStore};

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    build_router(state)
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        .layer(build_compression_layer())
        .layer(build_cors_layer(&server.cors))
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
}

/// Build the application state for the configured backend.
///
/// For PostgreSQL this connects the pool and, when enabled, applies
/// pending migrations before any request is served.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let (bookings, users): (Arc<dyn BookingStore>, Arc<dyn UserStore>) =
        match config.database.backend {
            StoreBackend::Postgres => {
                let db = DatabasePool::connect(&config.database).await?;
                if config.database.run_migrations {
                    tablebook_database::migration::run_migrations(db.pool()).await?;
                }
                let pool = db.pool().clone();
                (
                    Arc::new(PgBookingStore::new(pool.clone())),
                    Arc::new(UserRepository::new(pool)),
                )
            }
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory store; data is lost on restart");
                (
                    Arc::new(MemoryBookingStore::new()),
                    Arc::new(MemoryUserStore::new()),
                )
            }
        };

    let store_timeout = config.booking.store_timeout();
    let engine = AdmissionEngine::new(bookings, store_timeout);

    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let accounts = AccountService::new(
        users,
        Arc::new(PasswordHasher::new()),
        Arc::new(PasswordValidator::new(&config.auth)),
        Arc::new(JwtEncoder::new(&config.auth)),
        Arc::clone(&jwt_decoder),
        store_timeout,
    );

    Ok(AppState::new(config, engine, accounts, jwt_decoder))
}

/// Serve `state` until Ctrl+C or SIGTERM.
pub async fn run_server(state: AppState) -> Result<(), AppError> {
    let server = state.config.server.clone();
    let app = build_app(state, &server);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
        })?;

    tracing::info!("TableBook server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("TableBook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
