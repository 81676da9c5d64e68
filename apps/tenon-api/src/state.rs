//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Instant;

/// State for the app-level routes (health). The API routers carry their own
/// state; this one only tracks service metadata.
#[derive(Clone)]
pub struct AppState {
    /// Service startup time for uptime calculation.
    pub startup_time: Arc<Instant>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            startup_time: Arc::new(Instant::now()),
        }
    }
}
