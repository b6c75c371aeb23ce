//! # Transport Capability
//!
//! The external peer session layer the core is built on.
//!
//! The session core never does networking itself. Peer discovery, group
//! (lobby) membership, NAT traversal, and byte delivery all live behind the
//! [`Transport`] trait, supplied by the host. Asynchronous completions
//! (group created, group joined, incoming session request) surface as polled
//! [`TransportEvent`]s rather than callbacks, so the single-threaded tick
//! loop applies them at a point of its choosing, never mid-drain.
//!
//! ## Components
//! - **Transport**: the capability trait
//! - **TransportEvent**: asynchronous lifecycle completions
//! - **Loopback**: in-memory implementation for tests and demos

pub mod loopback;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::core::message::{GroupId, PeerId};
use crate::error::Result;

pub use loopback::LoopbackTransport;

/// Outcome of a group join attempt, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCode {
    Success,
    DoesNotExist,
    NotAllowed,
    Full,
    Banned,
    Error,
}

/// Destination for an outbound send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendTarget {
    Peer(PeerId),
    /// Deliver to every current group member except the sender.
    Broadcast,
}

/// Asynchronous completions delivered by the transport.
///
/// These arrive at the transport's pace, not the caller's; the session
/// controller polls them to completion at the start of each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A previously requested group creation finished.
    GroupCreated { success: bool, group_id: GroupId },
    /// A previously requested group join finished.
    GroupJoined {
        group_id: GroupId,
        permissions: u32,
        locked: bool,
        response: ResponseCode,
    },
    /// A remote peer wants to open a point-to-point session with us.
    SessionRequested { peer: PeerId },
}

/// The external peer session capability.
///
/// Implementations wrap a real lobby/P2P layer. All sends are fire-and-forget;
/// all group lifecycle operations complete asynchronously via
/// [`Transport::poll_event`]. When [`Transport::is_ready`] is false the core
/// treats every polling path as a no-op instead of an error.
pub trait Transport {
    /// Whether the underlying session layer is up and usable.
    fn is_ready(&self) -> bool;

    /// The local peer's stable identifier.
    fn local_peer(&self) -> PeerId;

    /// Request creation of a new group with the given member limit.
    /// Completion arrives as [`TransportEvent::GroupCreated`].
    fn create_group(&mut self, limit: u32) -> Result<()>;

    /// Request joining an existing group.
    /// Completion arrives as [`TransportEvent::GroupJoined`].
    fn join_group(&mut self, group: GroupId) -> Result<()>;

    /// Leave a group. Synchronous and infallible from the core's view.
    fn leave_group(&mut self, group: GroupId);

    /// Current member ids of a group, in transport index order.
    fn list_members(&self, group: GroupId) -> Vec<PeerId>;

    /// Resolve a peer's display name.
    fn resolve_name(&self, peer: PeerId) -> String;

    /// Send raw bytes to one peer or to the whole group.
    fn send_bytes(&mut self, target: SendTarget, bytes: &[u8]) -> Result<()>;

    /// Take the next pending inbound byte buffer, if any.
    fn poll_bytes(&mut self) -> Option<Bytes>;

    /// Take the next pending lifecycle event, if any.
    fn poll_event(&mut self) -> Option<TransportEvent>;

    /// Accept an incoming point-to-point session request.
    fn accept_session(&mut self, peer: PeerId);

    /// Mark a group as joinable (or not) by other peers.
    fn set_group_joinable(&mut self, group: GroupId, joinable: bool);

    /// Attach human-readable metadata to a group.
    fn set_group_metadata(&mut self, group: GroupId, key: &str, value: &str);

    /// Allow the transport to fall back to relayed delivery when direct
    /// connectivity fails.
    fn enable_relay_fallback(&mut self);
}
