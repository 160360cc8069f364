//! REST API handlers grouped by domain.

pub mod info;
pub mod users;

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

use access_db::DbError;

pub type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// Map a store error: caller mistakes are 400, everything else 500.
pub fn db_err(e: DbError) -> (StatusCode, Json<Value>) {
    match e {
        DbError::Usage(msg) => err_json(400, &msg),
        other => {
            tracing::error!(error = %other, "Store read failed");
            err_json(500, &other.to_string())
        }
    }
}
