//! HTTP boundary of the scoring engine.

mod admin;
mod ctf;
mod error;
pub mod state;
pub mod ws;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use flagforge_api_types::HealthCheckResponse;

pub use admin::create_admin_router;
pub use ctf::create_ctf_router;
pub use error::ApiError;
pub use state::AppState;
pub use ws::solves_websocket;

/// All routes of the service.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/ws/solves", get(solves_websocket))
        .merge(create_ctf_router())
        .merge(create_admin_router())
        .with_state(state)
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
