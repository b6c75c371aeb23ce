//! Property-based tests using proptest
//!
//! These tests validate codec invariants across a wide range of randomly
//! generated messages, ensuring robust behavior under all conditions.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use peer_session::core::message::{FieldValue, Message, PeerId};
use peer_session::core::serialization::{decode, encode, SerializationFormat};
use proptest::prelude::*;

fn field_value() -> impl Strategy<Value = FieldValue> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(FieldValue::Bool),
        any::<i64>().prop_map(FieldValue::Int),
        // Finite only: NaN breaks equality and JSON cannot carry it.
        (-1.0e12f64..1.0e12).prop_map(FieldValue::Float),
        "[a-zA-Z0-9 _-]{0,16}".prop_map(FieldValue::Str),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(FieldValue::Bytes),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(FieldValue::List),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(FieldValue::Map),
        ]
    })
}

fn message() -> impl Strategy<Value = Message> {
    (
        "[a-z_]{1,12}",
        prop::collection::btree_map("[a-z_]{1,8}", field_value(), 0..5),
        any::<u64>(),
        "[a-zA-Z0-9 ]{0,20}",
    )
        .prop_map(|(tag, fields, sender, name)| {
            let mut msg = Message::new(tag);
            msg.fields = fields;
            msg.sender_id = PeerId(sender);
            msg.sender_name = name;
            msg
        })
}

fn format() -> impl Strategy<Value = SerializationFormat> {
    prop_oneof![
        Just(SerializationFormat::Bincode),
        Just(SerializationFormat::Json),
        Just(SerializationFormat::MessagePack),
    ]
}

// Property: decode(encode(m)) == m for every valid message and format
proptest! {
    #[test]
    fn prop_message_roundtrip(msg in message(), fmt in format()) {
        let bytes = encode(&msg, fmt).expect("encode should not fail");
        let recovered = decode(&bytes).expect("decode should not fail");
        prop_assert_eq!(msg, recovered);
    }
}

// Property: encoding is deterministic for a fixed format
proptest! {
    #[test]
    fn prop_encoding_deterministic(msg in message(), fmt in format()) {
        let first = encode(&msg, fmt).expect("encode");
        let second = encode(&msg, fmt).expect("encode");
        prop_assert_eq!(first, second);
    }
}

// Property: decode of arbitrary bytes returns an error or a message, never panics
proptest! {
    #[test]
    fn prop_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(&data);
        prop_assert!(true);
    }
}

// Property: the first byte always identifies the configured format
proptest! {
    #[test]
    fn prop_format_byte_matches(msg in message(), fmt in format()) {
        let bytes = encode(&msg, fmt).expect("encode");
        prop_assert_eq!(bytes[0], fmt.format_byte());
    }
}
