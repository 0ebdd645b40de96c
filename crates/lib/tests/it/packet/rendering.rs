//! Whole-packet serialization and rendering configuration.

use std::collections::HashMap;

use indexmap::IndexMap;
use jsonpacket::{Packet, PacketConfig, Slot};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_mixed_native_and_raw_slots_render_together() {
    let mut packet =
        Packet::from_string_with(r#"{"raw": {"x": [1, 2]}}"#, IndexMap::<String, Slot>::new());
    packet.put("native", gadget(1, false));

    let json: serde_json::Value = serde_json::from_str(&packet.serialize()).unwrap();
    assert_eq!(json["raw"], json!({"x": [1, 2]}));
    assert_eq!(json["native"]["count"], 1);
    assert_eq!(json["native"]["part"], serde_json::Value::Null);
}

#[test]
fn test_display_matches_serialize() {
    let mut packet = Packet::new();
    packet.put("list", vec![1, 2, 3]);
    assert_eq!(packet.to_string(), packet.serialize());
}

#[test]
fn test_pretty_config_indents_output() {
    let mut packet = Packet::new().with_config(PacketConfig::new().with_pretty(true));
    packet.put_int("a", 1);
    assert_eq!(packet.serialize(), "{\n  \"a\": 1\n}");

    packet.config_mut().pretty = false;
    assert_eq!(packet.serialize(), r#"{"a":1}"#);
    assert_eq!(packet.to_pretty_string(), "{\n  \"a\": 1\n}");
}

#[test]
fn test_omit_nulls_drops_null_entries() {
    let mut packet = Packet::with_core(IndexMap::<String, Slot>::new())
        .with_config(PacketConfig::new().with_omit_nulls(true));
    packet.put("nothing", Option::<String>::None);
    packet.put("unit", ());
    packet.put_int("kept", 1);
    assert_eq!(packet.serialize(), r#"{"kept":1}"#);
}

#[test]
fn test_unserializable_value_falls_back_to_debug_text() {
    let mut tuple_keys: HashMap<(u8, u8), &str> = HashMap::new();
    tuple_keys.insert((1, 2), "pair");

    let mut packet = Packet::with_core(IndexMap::<String, Slot>::new());
    packet.put("ok", 1u8);
    packet.put("odd", tuple_keys);

    let json: serde_json::Value = serde_json::from_str(&packet.serialize()).unwrap();
    assert_eq!(json["ok"], 1);
    assert_eq!(json["odd"], r#"{(1, 2): "pair"}"#);
}

#[test]
fn test_config_loads_from_settings_blob() {
    let config: PacketConfig = serde_json::from_str(r#"{"omit_nulls": true}"#).unwrap();
    assert_eq!(config, PacketConfig::new().with_omit_nulls(true));
}
