//! Rendering configuration for packets.

use serde::{Deserialize, Serialize};

/// Options controlling how a packet renders itself as JSON text.
///
/// The defaults produce compact output that includes null entries. The struct
/// deserializes with per-field defaults, so a partial settings blob is accepted:
///
/// ```
/// use jsonpacket::PacketConfig;
///
/// let config: PacketConfig = serde_json::from_str(r#"{"pretty": true}"#).unwrap();
/// assert!(config.pretty);
/// assert!(!config.omit_nulls);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketConfig {
    /// Indent serialized output
    pub pretty: bool,
    /// Leave top-level entries whose JSON form is `null` out of serialized output
    pub omit_nulls: bool,
}

impl PacketConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_omit_nulls(mut self, omit_nulls: bool) -> Self {
        self.omit_nulls = omit_nulls;
        self
    }
}
