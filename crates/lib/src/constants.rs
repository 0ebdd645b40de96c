//! Reserved keys with a conventional meaning inside a packet.

/// Boolean flag signalling an application-level failure carried in the payload.
/// Absent means `false`.
pub const KEY_ERROR: &str = "error";

/// Human-readable message accompanying the payload, usually describing an error.
pub const KEY_MESSAGE: &str = "message";
