//! REST API for a solved schedule.
//!
//! Provides three GET endpoints:
//! - `/state`: market configuration and the report summary
//! - `/schedule`: one record per vehicle
//! - `/profile`: one record per slot, with optional range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::market::{MarketConfig, ScheduleReport};

/// Immutable application state shared across all request handlers.
///
/// Built once after the solver finishes and wrapped in `Arc`.
pub struct AppState {
    /// Market parameters of the run.
    pub config: MarketConfig,
    /// Solved schedule and its per-slot profile.
    pub report: ScheduleReport,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/schedule", get(handlers::get_schedule))
        .route("/profile", get(handlers::get_profile))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an error if the listener cannot bind to `addr` or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
