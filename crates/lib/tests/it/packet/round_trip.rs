//! Put, serialize, import into a fresh packet, read back with the original types.

use std::collections::HashMap;

use jsonpacket::Packet;

use crate::helpers::*;

#[test]
fn test_scalar_scenario() {
    let mut packet = Packet::new();
    packet.put_int("int", 99);
    packet.put_bool("flag", true);
    packet.put("msg", "hi".to_string());

    let mut received = Packet::from_string(&packet.serialize());
    assert_eq!(received.get_int("int", 0), 99);
    assert!(received.get_bool("flag", false));
    assert_eq!(received.get_string("msg"), Some("hi".to_string()));
}

#[test]
fn test_list_of_records_scenario() {
    let mut packet = Packet::new();
    packet.put("key", gadget_list());

    let mut received = reimport(&packet);
    let gadgets = received.get_list::<Gadget>("key").unwrap();
    assert_eq!(gadgets.len(), 2);
    assert_eq!(gadgets, gadget_list());
}

#[test]
fn test_every_supported_shape_round_trips() {
    let nested_list = vec![gadget_list()];
    let nested_map: HashMap<i32, HashMap<i32, Gadget>> = HashMap::from([(0, gadget_map())]);

    let mut packet = Packet::new();
    packet.put_bool("boolean", true);
    packet.put_double("double", 9.0);
    packet.put_int("int", 99);
    packet.put("string", "Hello World");
    packet.put("single_object", gadget(7, true));
    packet.put("object_array", [gadget(8, true), gadget(9, false)]);
    packet.put("normal_list", gadget_list());
    packet.put("normal_map", gadget_map());
    packet.put("nested_list", nested_list.clone());
    packet.put("nested_map", nested_map.clone());

    let mut received = reimport(&packet);
    assert_eq!(received.len(), packet.len());

    assert!(received.get_bool("boolean", false));
    assert_eq!(received.get_double("double", 0.0), 9.0);
    assert_eq!(received.get_int("int", 0), 99);
    assert_eq!(received.get_string("string").as_deref(), Some("Hello World"));
    assert_eq!(received.get::<Gadget>("single_object"), Some(gadget(7, true)));
    assert_eq!(
        received.get::<[Gadget; 2]>("object_array"),
        Some([gadget(8, true), gadget(9, false)])
    );
    assert_eq!(received.get_list::<Gadget>("normal_list"), Some(gadget_list()));
    assert_eq!(received.get_map::<i32, Gadget>("normal_map"), Some(gadget_map()));
    assert_eq!(
        received.get::<Vec<Vec<Gadget>>>("nested_list"),
        Some(nested_list)
    );
    assert_eq!(
        received.get::<HashMap<i32, HashMap<i32, Gadget>>>("nested_map"),
        Some(nested_map)
    );
}

#[test]
fn test_string_slice_put_reads_back_as_string() {
    let mut packet = Packet::new();
    packet.put("greeting", "hello");

    // Stored as &'static str; the read goes through its JSON form
    assert_eq!(packet.get_string("greeting"), Some("hello".to_string()));
    assert_eq!(reimport(&packet).get_string("greeting"), Some("hello".to_string()));
}

#[test]
fn test_second_round_trip_is_stable() {
    let mut packet = Packet::new();
    packet.put("normal_map", gadget_map());
    packet.put_int("int", 1);

    let first = reimport(&packet);
    let second = reimport(&first);
    let a: serde_json::Value = serde_json::from_str(&first.serialize()).unwrap();
    let b: serde_json::Value = serde_json::from_str(&second.serialize()).unwrap();
    assert_eq!(a, b);
}
