//! Wire codec behavior across formats and malformed inputs.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use peer_session::core::message::{FieldValue, Message, PeerId};
use peer_session::core::serialization::{decode, encode, SerializationFormat};
use peer_session::error::SessionError;

fn nested_message() -> Message {
    let mut inner = BTreeMap::new();
    inner.insert("x".to_string(), FieldValue::Int(-3));
    inner.insert("y".to_string(), FieldValue::Float(2.75));

    let mut msg = Message::new("state")
        .with_field("ready", true)
        .with_field("nick", "bob")
        .with_field("score", 1200i64);
    msg.fields
        .insert("position".to_string(), FieldValue::Map(inner));
    msg.fields.insert(
        "inventory".to_string(),
        FieldValue::List(vec![
            FieldValue::Str("sword".to_string()),
            FieldValue::Bytes(vec![0, 1, 2, 255]),
        ]),
    );
    msg.sender_id = PeerId(9001);
    msg.sender_name = "bob".to_string();
    msg
}

#[test]
fn nested_fields_roundtrip_in_every_format() {
    let msg = nested_message();
    for format in [
        SerializationFormat::Bincode,
        SerializationFormat::Json,
        SerializationFormat::MessagePack,
    ] {
        let bytes = encode(&msg, format).unwrap();
        assert_eq!(bytes[0], format.format_byte());
        let recovered = decode(&bytes).unwrap();
        assert_eq!(msg, recovered, "format: {}", format.name());
    }
}

#[test]
fn receiver_does_not_care_about_sender_format() {
    // Same message through all three formats decodes identically.
    let msg = nested_message();
    let decoded: Vec<Message> = [
        SerializationFormat::Bincode,
        SerializationFormat::Json,
        SerializationFormat::MessagePack,
    ]
    .into_iter()
    .map(|f| decode(&encode(&msg, f).unwrap()).unwrap())
    .collect();

    assert_eq!(decoded[0], decoded[1]);
    assert_eq!(decoded[1], decoded[2]);
}

#[test]
fn empty_packet_is_a_decode_error() {
    assert!(matches!(decode(&[]), Err(SessionError::Decode(_))));
}

#[test]
fn unknown_format_byte_is_a_decode_error() {
    assert!(matches!(decode(&[0x42, 1, 2, 3]), Err(SessionError::Decode(_))));
}

#[test]
fn garbage_payload_is_a_decode_error() {
    // Valid bincode format byte, junk payload.
    let mut data = vec![0x01];
    data.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert!(matches!(decode(&data), Err(SessionError::Decode(_))));
}

#[test]
fn untagged_message_never_reaches_the_wire() {
    let msg = Message::new("");
    for format in [
        SerializationFormat::Bincode,
        SerializationFormat::Json,
        SerializationFormat::MessagePack,
    ] {
        assert!(matches!(
            encode(&msg, format),
            Err(SessionError::Encode(_))
        ));
    }
}

#[test]
fn untagged_payload_is_rejected_on_decode() {
    // Hand-build a JSON payload with an empty tag; receivers must ignore it.
    let raw = br#"{"tag":"","fields":{},"sender_id":1,"sender_name":"x"}"#;
    let mut data = vec![0x02];
    data.extend_from_slice(raw);
    assert!(matches!(decode(&data), Err(SessionError::Decode(_))));
}
