use std::time::Duration;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status: `ok` or `degraded`.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether a database is configured at all.
    pub db_configured: bool,
    /// Whether the database answered a probe just now.
    pub db_healthy: bool,
}

/// GET /health -- returns service and database health.
///
/// A disconnected or unreachable store reports `degraded`, not an error:
/// the catalog still serves fallback data in that state.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match state.data.pool() {
        Some(pool) => dapparchive_db::health_check(pool, Duration::from_secs(2))
            .await
            .is_ok(),
        None => false,
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_configured: state.data.is_connected(),
        db_healthy,
    })
}

/// Mount health check routes (also merged at root level, outside `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
