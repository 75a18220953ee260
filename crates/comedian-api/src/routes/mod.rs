//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{commands, health};
use crate::state::AppState;

/// Slash-command routes (rate limited)
pub fn create_router() -> Router<AppState> {
    Router::new().route("/commands", post(commands::handle_command))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
