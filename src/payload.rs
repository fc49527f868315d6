//! Secret payload decoding and rendering
//!
//! A payload is the JSON object stored as a secret's string value. Values are
//! normally strings, but anything JSON can hold is kept untouched so a
//! read-modify-write cycle does not change the types of keys it didn't touch.

use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::backends::SecretBackend;
use crate::error::SecretsError;

pub type Payload = BTreeMap<String, Value>;

/// Parse a secret string as a JSON object
pub fn decode_payload(name: &str, secret_string: &str) -> Result<Payload, SecretsError> {
    serde_json::from_str(secret_string).map_err(|source| SecretsError::InvalidPayload {
        name: name.to_string(),
        source,
    })
}

/// Serialize a payload back to the compact JSON stored by the service
pub fn encode_payload(payload: &Payload) -> Result<String, SecretsError> {
    Ok(serde_json::to_string(payload)?)
}

/// Text form of a value: strings verbatim, anything else as JSON
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON type name of a value
pub fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fetch a secret's string value without decoding it
pub async fn fetch_raw(backend: &dyn SecretBackend, name: &str) -> Result<String> {
    backend.get_secret_value(name).await
}

/// Fetch and decode a secret's payload
pub async fn fetch_payload(backend: &dyn SecretBackend, name: &str) -> Result<Payload> {
    let secret_string = fetch_raw(backend, name).await?;
    Ok(decode_payload(name, &secret_string)?)
}

/// Keys of a secret's payload, sorted
pub async fn fetch_keys(backend: &dyn SecretBackend, name: &str) -> Result<Vec<String>> {
    Ok(fetch_payload(backend, name).await?.into_keys().collect())
}
