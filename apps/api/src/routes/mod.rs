pub mod health;

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::leads::handlers;
use crate::state::AppState;

/// GET /
/// Unauthenticated welcome response.
async fn welcome_handler() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Lead Management API" }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/leads", post(handlers::handle_create_lead))
        .route("/api/v1/leads", get(handlers::handle_list_leads))
        .route(
            "/api/v1/leads/:id/state",
            patch(handlers::handle_update_lead_state),
        )
        .with_state(state)
}
