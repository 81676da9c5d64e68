//! Health endpoint.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
///
/// Liveness only; does not probe the external services.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.startup_time.elapsed().as_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
