//! # Core Message Components
//!
//! Message model and binary serialization.
//!
//! This module provides the foundation for everything that crosses the wire:
//! the tagged message structure and its multi-format encoding.
//!
//! ## Components
//! - **Message**: Tagged field map with sender identity
//! - **Serialization**: Format-byte-prefixed encode/decode
//!
//! ## Wire Format
//! ```text
//! [Format(1)] [Payload(N)]
//! ```
//!
//! The format byte makes every encoded message self-describing, so a receiver
//! decodes correctly no matter which format the sender was configured with.

pub mod message;
pub mod serialization;
