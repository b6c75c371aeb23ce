//! # Message Model
//!
//! The tagged message structure exchanged between group members.
//!
//! A [`Message`] is a string tag plus a map of named fields. The tag is the
//! routing discriminator: subscribers register per tag, and a message with an
//! empty tag is refused by the codec on both ends. Sender identity is stamped
//! at send time and is only as trustworthy as the transport that reported it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque peer identifier, unique and stable for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId(pub u64);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque group (lobby) identifier. `GroupId::NONE` means "no active group".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u64);

impl GroupId {
    /// Sentinel for "no group". Matches the transport convention of id 0.
    pub const NONE: GroupId = GroupId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A group member: peer id plus the display name the transport resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: PeerId,
    pub name: String,
}

/// The local peer's role in the active group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupRole {
    Host,
    Participant,
}

/// A field value carried inside a message.
///
/// Externally tagged so that every configured wire format round-trips it,
/// including bincode, which cannot deserialize self-describing `Value` types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Borrow the string content, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

/// A tagged message exchanged between group members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Routing discriminator. Never empty on the wire.
    pub tag: String,
    /// Named payload fields.
    pub fields: BTreeMap<String, FieldValue>,
    /// Stamped at send time; trusted only as far as the transport is.
    pub sender_id: PeerId,
    pub sender_name: String,
}

impl Message {
    /// Create an empty message with the given tag and no sender identity yet.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            fields: BTreeMap::new(),
            sender_id: PeerId(0),
            sender_name: String::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}
