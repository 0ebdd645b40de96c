//! Error types for packet operations.
//!
//! Most of the public [`Packet`](crate::Packet) surface is best-effort: failures are
//! logged and degrade to `None`, a default, or an unchanged container. The variants here
//! are what the fallible twins (`try_get`, `try_deserialize`, ...) and the adapter report.

use thiserror::Error;

use crate::shape::{Shape, ShapeMismatch};

/// Structured error types for packet operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PacketError {
    /// JSON text could not be parsed
    #[error("Malformed JSON: {reason}")]
    Parse { reason: String },

    /// A JSON fragment does not match the requested target shape
    #[error("Cannot map key '{key}' to {target}: {reason}")]
    Mapping {
        key: String,
        target: String,
        reason: String,
    },

    /// Bulk import expects a JSON object at the top level
    #[error("Expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },

    /// The untyped accessor hit a slot that was never materialized
    #[error("Value for key '{key}' is an unmaterialized JSON fragment; use a typed getter")]
    Unmaterialized { key: String },

    /// A backing store could not be built from the current entries
    #[error("Failed to construct {store} backing store: {reason}")]
    Construction { store: &'static str, reason: String },

    /// A native value refused to serialize
    #[error("Failed to render value for key '{key}': {reason}")]
    Render { key: String, reason: String },
}

impl PacketError {
    /// Build a parse or mapping error from a `serde_json` failure.
    ///
    /// Syntax and EOF failures are parse errors, everything else is a mapping error
    /// against `target`.
    pub fn from_json(key: &str, target: &str, err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Syntax | Category::Eof => PacketError::Parse {
                reason: err.to_string(),
            },
            Category::Data | Category::Io => PacketError::Mapping {
                key: key.to_string(),
                target: target.to_string(),
                reason: err.to_string(),
            },
        }
    }

    /// Build a mapping error from a fragment that does not fit `shape`.
    pub fn from_mismatch(key: &str, shape: &Shape, mismatch: ShapeMismatch) -> Self {
        PacketError::Mapping {
            key: key.to_string(),
            target: shape.to_string(),
            reason: mismatch.to_string(),
        }
    }

    /// Check if this error is a JSON syntax failure
    pub fn is_parse_error(&self) -> bool {
        matches!(self, PacketError::Parse { .. } | PacketError::NotAnObject { .. })
    }

    /// Check if this error is a shape mismatch
    pub fn is_mapping_error(&self) -> bool {
        matches!(self, PacketError::Mapping { .. })
    }

    /// Check if this error came from the untyped escape hatch
    pub fn is_unmaterialized(&self) -> bool {
        matches!(self, PacketError::Unmaterialized { .. })
    }

    /// Check if this error came from swapping the backing store
    pub fn is_construction_error(&self) -> bool {
        matches!(self, PacketError::Construction { .. })
    }

    /// Get the key if this is a key-related error
    pub fn key(&self) -> Option<&str> {
        match self {
            PacketError::Mapping { key, .. }
            | PacketError::Unmaterialized { key }
            | PacketError::Render { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PacketError {
    fn from(err: serde_json::Error) -> Self {
        PacketError::from_json("", "value", err)
    }
}
