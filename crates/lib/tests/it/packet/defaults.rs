//! Best-effort reads and imports: absent or unconvertible values degrade, nothing panics.

use jsonpacket::{Packet, PacketError};

use crate::helpers::*;

#[test]
fn test_missing_key_yields_none_or_fallback() {
    let mut packet = Packet::new();
    assert_eq!(packet.get::<Gadget>("missing"), None);
    assert_eq!(packet.get_or("missing", gadget(42, false)), gadget(42, false));
    assert_eq!(packet.get_int("missing", -1), -1);
    assert_eq!(packet.get_string("missing"), None);
    assert_eq!(packet.get_string_or("missing", "fallback"), "fallback");
    assert!(packet.try_get::<Gadget>("missing").unwrap().is_none());
}

#[test]
fn test_unconvertible_fragment_yields_fallback() {
    let mut packet = Packet::from_string(r#"{"list": [1, 2], "text": "abc"}"#);
    assert_eq!(packet.get_or("list", gadget(1, false)), gadget(1, false));
    assert_eq!(packet.get_int("text", 7), 7);
    assert_eq!(packet.get_double("text", 1.5), 1.5);
    assert!(!packet.get_bool("text", false));
}

#[test]
fn test_null_entries_fall_back_to_defaults() {
    let mut packet = Packet::from_string(r#"{"message": null, "count": null}"#);
    assert_eq!(packet.get_string("message"), None);
    assert_eq!(packet.get_int("count", 3), 3);
    assert_eq!(packet.get::<Option<i64>>("count"), Some(None));
}

#[test]
fn test_try_get_reports_mapping_errors() {
    let mut packet = Packet::from_string(r#"{"gadget": [1, 2, 3]}"#);
    let err = packet.try_get::<Gadget>("gadget").unwrap_err();
    assert!(err.is_mapping_error());
    assert_eq!(err.key(), Some("gadget"));
}

#[test]
fn test_malformed_import_leaves_packet_unchanged() {
    let mut packet = Packet::new();
    packet.put_int("kept", 1);

    packet.deserialize("{not json");

    assert_eq!(packet.len(), 1);
    assert_eq!(packet.get_int("kept", 0), 1);
}

#[test]
fn test_truncated_import_inserts_nothing() {
    let mut packet = Packet::new();
    let err = packet
        .try_deserialize(r#"{"a": 1, "b": [1, 2"#)
        .unwrap_err();
    assert!(err.is_parse_error());
    assert!(packet.is_empty());
}

#[test]
fn test_non_object_document_is_rejected() {
    let mut packet = Packet::new();
    let err = packet.try_deserialize("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, PacketError::NotAnObject { found: "array" }));
    assert!(packet.is_empty());
}

#[test]
fn test_from_string_on_garbage_is_empty() {
    let packet = Packet::from_string("definitely not json");
    assert!(packet.is_empty());
    assert_eq!(packet.serialize(), "{}");
}

#[test]
fn test_import_overwrites_existing_keys() {
    let mut packet = Packet::new();
    packet.put_int("a", 1);
    packet.put_int("b", 2);

    let imported = packet.try_deserialize(r#"{"b": 20, "c": 30}"#).unwrap();
    assert_eq!(imported, 2);
    assert_eq!(packet.len(), 3);
    assert_eq!(packet.get_int("a", 0), 1);
    assert_eq!(packet.get_int("b", 0), 20);
    assert_eq!(packet.get_int("c", 0), 30);
}

#[test]
fn test_raw_entry_refuses_unmaterialized_fragments() {
    let mut packet = Packet::from_string(r#"{"gadget": {"count": 1, "strings": [], "part": null}, "n": 4}"#);

    let err = packet.raw_entry("gadget").unwrap_err();
    assert!(err.is_unmaterialized());

    // Scalars are native from the start
    let n = packet.raw_entry("n").unwrap().unwrap();
    assert_eq!(n.as_any().downcast_ref::<i64>(), Some(&4));
    assert!(packet.raw_entry("missing").unwrap().is_none());

    // Once read with a type, the untyped accessor works
    packet.get::<Gadget>("gadget").unwrap();
    let gadget = packet.raw_entry("gadget").unwrap().unwrap();
    assert_eq!(gadget.as_any().downcast_ref::<Gadget>().map(|g| g.count), Some(1));
}
