use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the entity store is reachable.
    pub store_healthy: bool,
    /// Whether an upstream completion key is configured.
    pub llm_configured: bool,
}

/// GET /health -- returns service, store and upstream readiness.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = stagecraft_db::health_check(&state.pool).await.is_ok();
    let llm_configured = state.llm.has_credentials();

    let status = if store_healthy && llm_configured {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
        llm_configured,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
