//! Persistent state: a JSON object mapping parameter id to normalized value.
//!
//! ```json
//! {"friction": 0.5, "span": 0.5, "drive": 1.0, "inputTilt": 0.5}
//! ```
//!
//! Stable string ids (not slot indices) keep saved sessions loadable if the
//! parameter order ever changes. Loading is forgiving: entries it does not
//! understand are skipped and parameters absent from the blob keep their
//! current value.

use elastika_core::{EngineParam, HostParams};

use crate::error::StateError;

/// Serialize every parameter target to JSON bytes.
pub fn save_state(params: &HostParams) -> Result<Vec<u8>, StateError> {
    let mut state = serde_json::Map::new();
    for param in EngineParam::ALL {
        state.insert(
            param.id().to_string(),
            serde_json::Value::from(f64::from(params.get(param))),
        );
    }
    Ok(serde_json::to_vec(&serde_json::Value::Object(state))?)
}

/// Apply a saved blob to `params`.
///
/// Returns the number of values applied. A blob that is not valid JSON, or
/// is JSON but not an object, applies nothing and is logged at `warn`.
pub fn load_state(params: &HostParams, blob: &[u8]) -> usize {
    let value: serde_json::Value = match serde_json::from_slice(blob) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, len = blob.len(), "ignoring unreadable state blob");
            return 0;
        }
    };

    let Some(obj) = value.as_object() else {
        tracing::warn!(kind = json_kind(&value), "ignoring state blob that is not an object");
        return 0;
    };

    let mut applied = 0;
    for (key, val) in obj {
        let Some(v) = val.as_f64() else {
            tracing::debug!(key = %key, "skipping non-numeric state entry");
            continue;
        };
        if params.set_by_id(key, v as f32) {
            applied += 1;
        } else {
            tracing::debug!(key = %key, "skipping unknown state entry");
        }
    }

    tracing::info!(applied, entries = obj.len(), "state loaded");
    applied
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
