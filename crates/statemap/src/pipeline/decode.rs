//! Decoder stage: optional JSON parsing of the incoming payload.

use serde_json::Value;

use super::StageError;

/// Parse string payloads as JSON. Already-structured values pass through.
pub(crate) fn decode(incoming: &Value) -> Result<Value, StageError> {
    match incoming {
        Value::String(text) => {
            serde_json::from_str(text).map_err(|e| StageError::Json(e.to_string()))
        }
        other => Ok(other.clone()),
    }
}
