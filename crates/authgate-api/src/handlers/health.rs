//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache_ok = match state.cache.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "Session store health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if cache_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cache: if cache_ok { "connected" } else { "unreachable" }.to_string(),
        bridge: state.bus.metrics(),
    })
}
