//! Credential resolution.

use access_db::CredentialLookup;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use super::{ApiResult, db_err, err_json};
use crate::app::SharedState;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /users/:value?type=id|discord|steam64
pub async fn get_user(
    State(state): State<SharedState>,
    Path(value): Path<String>,
    Query(q): Query<ResolveQuery>,
) -> ApiResult {
    let lookup = match q.kind.as_deref().unwrap_or("id") {
        "id" => {
            let id = value
                .parse::<i64>()
                .map_err(|_| err_json(400, "id must be integer"))?;
            CredentialLookup::by_id(id)
        }
        "discord" => CredentialLookup::by_discord(&value),
        "steam64" => CredentialLookup::by_steam(&value),
        _ => return Err(err_json(400, "invalid resolve type")),
    };

    let stores = state.stores().clone();
    let credential = tokio::task::spawn_blocking(move || stores.credentials.get_by_key(&lookup))
        .await
        .map_err(|e| err_json(500, &e.to_string()))?
        .map_err(db_err)?;
    Ok(Json(json!(credential)))
}
