use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use super::api;
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/ping", get(ping_handler))
        // --- Info ---
        .route("/users/info/access", get(api::info::access_info))
        .route("/users/access_info", get(api::info::access_info))
        .route("/users/info/user_get_type", get(api::info::user_get_types))
        // --- Users ---
        .route("/users/{value}", get(api::users::get_user))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn ping_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}
