//! Static catalogs.

use axum::Json;
use serde_json::{Value, json};

use crate::config::USER_GET_TYPES;
use crate::config::access_keys;

/// GET /users/info/access, GET /users/access_info
pub async fn access_info() -> Json<Value> {
    Json(json!({
        "all_access_keys": access_keys::all_access_keys(),
        "base_access": access_keys::base_access(),
    }))
}

/// GET /users/info/user_get_type
pub async fn user_get_types() -> Json<Value> {
    Json(json!(USER_GET_TYPES))
}
