//! JSON payloads stored in blob columns.
//!
//! A payload that does not decode to its documented shape reads back as the
//! shape's empty default; reads never fail because of one.

use rusqlite::types::Value;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encode a payload for storage.
pub fn encode<T: Serialize>(column: &'static str, value: &T) -> Value {
    match serde_json::to_string(value) {
        Ok(json) => Value::Text(json),
        Err(e) => {
            tracing::error!(column, error = %e, "Failed to encode blob, storing empty payload");
            Value::Text(String::new())
        }
    }
}

/// Decode a stored payload, falling back to `T::default()`.
pub fn decode_or_default<T>(column: &'static str, raw: Value) -> T
where
    T: DeserializeOwned + Default,
{
    let parsed = match &raw {
        Value::Text(text) => serde_json::from_str(text),
        Value::Blob(bytes) => serde_json::from_slice(bytes),
        other => {
            tracing::warn!(column, kind = %other.data_type(), "Blob column holds no payload, using empty default");
            return T::default();
        }
    };

    parsed.unwrap_or_else(|e| {
        tracing::warn!(column, error = %e, "Undecodable blob, using empty default");
        T::default()
    })
}
