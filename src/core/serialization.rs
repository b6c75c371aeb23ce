//! # Serialization Formats
//!
//! Multi-format encoding for protocol messages.
//! Supports bincode (default), JSON (debugging/interop), and MessagePack
//! (compact encoding).
//!
//! Every encoded message starts with a one-byte format identifier, so decode
//! never needs to know what the sender was configured with: the wire is
//! self-describing and `decode(encode(m)) == m` holds for any format mix.
//!
//! ## Performance Characteristics
//! - **Bincode**: fastest, binary
//! - **MessagePack**: compact, binary
//! - **JSON**: human-readable, text

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::core::message::Message;
use crate::error::{Result, SessionError};

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    /// Binary compact format (default, fastest)
    #[default]
    Bincode,
    /// Human-readable JSON format (debugging, interop)
    Json,
    /// Compact binary format (MessagePack, efficient)
    MessagePack,
}

impl SerializationFormat {
    /// Get the format identifier byte for the wire
    pub fn format_byte(self) -> u8 {
        match self {
            SerializationFormat::Bincode => 0x01,
            SerializationFormat::Json => 0x02,
            SerializationFormat::MessagePack => 0x03,
        }
    }

    /// Detect format from identifier byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(SerializationFormat::Bincode),
            0x02 => Some(SerializationFormat::Json),
            0x03 => Some(SerializationFormat::MessagePack),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::Bincode => "Bincode",
            SerializationFormat::Json => "JSON",
            SerializationFormat::MessagePack => "MessagePack",
        }
    }
}

/// Encode a message with a format-byte header.
///
/// Refuses messages with an empty tag: untagged payloads are undeliverable
/// and must never reach the wire.
pub fn encode(msg: &Message, format: SerializationFormat) -> Result<Bytes> {
    if msg.tag.is_empty() {
        return Err(SessionError::Encode("message tag must not be empty".to_string()));
    }

    let payload = match format {
        SerializationFormat::Bincode => {
            bincode::serialize(msg).map_err(|e| SessionError::Encode(e.to_string()))?
        }
        SerializationFormat::Json => {
            serde_json::to_vec(msg).map_err(|e| SessionError::Encode(e.to_string()))?
        }
        SerializationFormat::MessagePack => {
            rmp_serde::to_vec(msg).map_err(|e| SessionError::Encode(e.to_string()))?
        }
    };

    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(format.format_byte());
    data.extend_from_slice(&payload);
    Ok(Bytes::from(data))
}

/// Decode a message from format-byte-prefixed bytes.
///
/// Fails with [`SessionError::Decode`] on empty input, an unknown format
/// byte, a malformed payload, or a decoded message with an empty tag.
pub fn decode(data: &[u8]) -> Result<Message> {
    let (format_byte, payload) = data
        .split_first()
        .ok_or_else(|| SessionError::Decode("empty packet".to_string()))?;

    let format = SerializationFormat::from_byte(*format_byte)
        .ok_or_else(|| SessionError::Decode(format!("unknown format byte: {format_byte:#04x}")))?;

    let msg: Message = match format {
        SerializationFormat::Bincode => {
            bincode::deserialize(payload).map_err(|e| SessionError::Decode(e.to_string()))?
        }
        SerializationFormat::Json => {
            serde_json::from_slice(payload).map_err(|e| SessionError::Decode(e.to_string()))?
        }
        SerializationFormat::MessagePack => {
            rmp_serde::from_slice(payload).map_err(|e| SessionError::Decode(e.to_string()))?
        }
    };

    if msg.tag.is_empty() {
        return Err(SessionError::Decode("message tag must not be empty".to_string()));
    }

    Ok(msg)
}
