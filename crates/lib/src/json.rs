//! The JSON collaborator seam.
//!
//! All text parsing and rendering goes through these two functions so the rest of the
//! crate only deals with `serde_json::Value` trees.

use serde_json::Value;

use crate::{Result, errors::PacketError};

/// Parse JSON text into a generic tree.
pub fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| PacketError::Parse {
        reason: e.to_string(),
    })
}

/// Render a JSON tree as text.
///
/// Rendering a `Value` only fails for writer errors, which a `String` never produces; a
/// failure is logged and rendered as `null` so callers always get valid JSON back.
pub fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.unwrap_or_else(|err| {
        tracing::error!(error = %err, "Rendering a JSON tree failed");
        "null".to_string()
    })
}

/// Name of a JSON node's kind, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
