//! Remote settings fetched once at startup from the overlord service.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};

/// GET `url` and flatten the JSON object body into a string map.
///
/// Never fails: every problem is logged and yields an empty map.
pub async fn fetch_remote_config(url: &str, timeout: Duration) -> HashMap<String, String> {
    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build remote config client");
            return HashMap::new();
        }
    };

    let resp = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) if e.is_timeout() => {
            tracing::warn!(url, "Remote config request timed out");
            return HashMap::new();
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Remote config request failed");
            return HashMap::new();
        }
    };

    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(url, %status, "Remote config endpoint returned an error status");
        return HashMap::new();
    }

    match resp.json::<Map<String, Value>>().await {
        Ok(body) => body
            .into_iter()
            .map(|(key, value)| (key, render(value)))
            .collect(),
        Err(e) => {
            tracing::warn!(url, error = %e, "Remote config body is not a JSON object");
            HashMap::new()
        }
    }
}

/// Strings are kept verbatim; any other value keeps its JSON text.
fn render(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
