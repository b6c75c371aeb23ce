//! # peer-session
//!
//! Tick-driven peer group session core.
//!
//! This crate is the messaging heart of a lobby-based multiplayer setup:
//! create or join a group of peers, track who is in it, and exchange tagged
//! structured messages, all over an externally provided transport. The crate
//! does no networking of its own — peer discovery, NAT traversal, and byte
//! delivery live behind the [`transport::Transport`] trait, and the host
//! drives the core by calling [`protocol::session::SessionController::tick`]
//! once per frame.
//!
//! ## Architecture
//! - [`core`] — the tagged [`core::message::Message`] model and its
//!   self-describing multi-format serialization
//! - [`transport`] — the external session capability, plus an in-memory
//!   loopback implementation
//! - [`protocol`] — session lifecycle, membership tracking, the bounded
//!   packet pump, and per-tag subscriber dispatch
//! - [`config`] — session configuration from TOML files, env, or code
//! - [`error`] — the non-fatal error taxonomy
//!
//! ## Example
//! ```
//! use peer_session::config::SessionConfig;
//! use peer_session::core::message::{Message, PeerId};
//! use peer_session::protocol::session::SessionController;
//! use peer_session::transport::{LoopbackTransport, SendTarget};
//!
//! # fn main() -> peer_session::error::Result<()> {
//! let transport = LoopbackTransport::new(PeerId(1), "alice");
//! let mut session = SessionController::new(transport, SessionConfig::default())?;
//!
//! session.subscribe("message", |msg| {
//!     println!("[{}] {:?}", msg.sender_name, msg.field("text"));
//! })?;
//!
//! session.create_group()?;
//! session.tick(); // applies the creation completion
//!
//! session.send_message(
//!     SendTarget::Broadcast,
//!     Message::new("message").with_field("text", "hello, lobby"),
//! )?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use config::SessionConfig;
pub use crate::core::message::{GroupId, GroupRole, Member, Message, PeerId};
pub use error::{Result, SessionError};
pub use protocol::session::{SessionController, SessionState};
pub use transport::{SendTarget, Transport, TransportEvent};
