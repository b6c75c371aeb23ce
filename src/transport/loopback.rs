//! # Loopback Transport
//!
//! In-memory [`Transport`] implementation for tests and demos.
//!
//! Simulates the external session layer with plain queues: group lifecycle
//! requests complete by pushing a [`TransportEvent`] that the next poll picks
//! up, inbound packets are whatever the test queued, and sends are recorded
//! for inspection instead of hitting a network.

use std::collections::{HashMap, VecDeque};

use bytes::Bytes;
use tracing::debug;

use crate::core::message::{GroupId, PeerId};
use crate::error::{Result, SessionError};
use crate::transport::{ResponseCode, SendTarget, Transport, TransportEvent};

#[derive(Debug, Default)]
struct GroupState {
    limit: u32,
    members: Vec<PeerId>,
    joinable: bool,
    metadata: HashMap<String, String>,
}

/// In-memory transport. One instance models one peer's view of the world.
pub struct LoopbackTransport {
    local: PeerId,
    ready: bool,
    names: HashMap<PeerId, String>,
    groups: HashMap<GroupId, GroupState>,
    inbound: VecDeque<Bytes>,
    events: VecDeque<TransportEvent>,
    sent: Vec<(SendTarget, Bytes)>,
    accepted: Vec<PeerId>,
    relay_enabled: bool,
    next_group: u64,
    refuse_create: bool,
    refuse_join: Option<ResponseCode>,
}

impl LoopbackTransport {
    pub fn new(local: PeerId, name: impl Into<String>) -> Self {
        let mut names = HashMap::new();
        names.insert(local, name.into());
        Self {
            local,
            ready: true,
            names,
            groups: HashMap::new(),
            inbound: VecDeque::new(),
            events: VecDeque::new(),
            sent: Vec::new(),
            accepted: Vec::new(),
            relay_enabled: false,
            next_group: 1,
            refuse_create: false,
            refuse_join: None,
        }
    }

    /// Register a remote peer and its display name.
    pub fn register_peer(&mut self, peer: PeerId, name: impl Into<String>) {
        self.names.insert(peer, name.into());
    }

    /// Install a pre-existing group, as if other peers had created it.
    pub fn seed_group(&mut self, group: GroupId, limit: u32, members: Vec<PeerId>) {
        self.groups.insert(
            group,
            GroupState {
                limit,
                members,
                joinable: true,
                metadata: HashMap::new(),
            },
        );
    }

    /// Queue an inbound packet for the next `poll_bytes`.
    pub fn queue_inbound(&mut self, bytes: Bytes) {
        self.inbound.push_back(bytes);
    }

    /// Queue a lifecycle event for the next `poll_event`.
    pub fn queue_event(&mut self, event: TransportEvent) {
        self.events.push_back(event);
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Make the next `create_group` complete with failure.
    pub fn refuse_next_create(&mut self) {
        self.refuse_create = true;
    }

    /// Make the next `join_group` complete with the given response code.
    pub fn refuse_next_join(&mut self, response: ResponseCode) {
        self.refuse_join = Some(response);
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> &[(SendTarget, Bytes)] {
        &self.sent
    }

    pub fn accepted_sessions(&self) -> &[PeerId] {
        &self.accepted
    }

    pub fn relay_enabled(&self) -> bool {
        self.relay_enabled
    }

    pub fn group_metadata(&self, group: GroupId, key: &str) -> Option<&str> {
        self.groups
            .get(&group)
            .and_then(|g| g.metadata.get(key))
            .map(String::as_str)
    }

    pub fn group_joinable(&self, group: GroupId) -> bool {
        self.groups.get(&group).map(|g| g.joinable).unwrap_or(false)
    }

    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }
}

impl Transport for LoopbackTransport {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn local_peer(&self) -> PeerId {
        self.local
    }

    fn create_group(&mut self, limit: u32) -> Result<()> {
        if !self.ready {
            return Err(SessionError::TransportUnavailable);
        }

        if std::mem::take(&mut self.refuse_create) {
            self.events.push_back(TransportEvent::GroupCreated {
                success: false,
                group_id: GroupId::NONE,
            });
            return Ok(());
        }

        let group_id = GroupId(self.next_group);
        self.next_group += 1;
        self.groups.insert(
            group_id,
            GroupState {
                limit,
                members: vec![self.local],
                joinable: false,
                metadata: HashMap::new(),
            },
        );
        self.events.push_back(TransportEvent::GroupCreated {
            success: true,
            group_id,
        });
        Ok(())
    }

    fn join_group(&mut self, group: GroupId) -> Result<()> {
        if !self.ready {
            return Err(SessionError::TransportUnavailable);
        }

        let response = if let Some(forced) = self.refuse_join.take() {
            forced
        } else {
            match self.groups.get(&group) {
                None => ResponseCode::DoesNotExist,
                Some(state) if state.members.len() as u32 >= state.limit => ResponseCode::Full,
                Some(_) => ResponseCode::Success,
            }
        };

        if response == ResponseCode::Success {
            if let Some(state) = self.groups.get_mut(&group) {
                if !state.members.contains(&self.local) {
                    state.members.push(self.local);
                }
            }
        }

        self.events.push_back(TransportEvent::GroupJoined {
            group_id: group,
            permissions: 0,
            locked: false,
            response,
        });
        Ok(())
    }

    fn leave_group(&mut self, group: GroupId) {
        if let Some(state) = self.groups.get_mut(&group) {
            state.members.retain(|p| *p != self.local);
        }
    }

    fn list_members(&self, group: GroupId) -> Vec<PeerId> {
        self.groups
            .get(&group)
            .map(|g| g.members.clone())
            .unwrap_or_default()
    }

    fn resolve_name(&self, peer: PeerId) -> String {
        self.names
            .get(&peer)
            .cloned()
            .unwrap_or_else(|| format!("peer-{peer}"))
    }

    fn send_bytes(&mut self, target: SendTarget, bytes: &[u8]) -> Result<()> {
        if !self.ready {
            return Err(SessionError::TransportUnavailable);
        }
        debug!(
            target: "peer_session::transport",
            destination = ?target,
            len = bytes.len(),
            "loopback send"
        );
        self.sent.push((target, Bytes::copy_from_slice(bytes)));
        Ok(())
    }

    fn poll_bytes(&mut self) -> Option<Bytes> {
        if !self.ready {
            return None;
        }
        self.inbound.pop_front()
    }

    fn poll_event(&mut self) -> Option<TransportEvent> {
        if !self.ready {
            return None;
        }
        self.events.pop_front()
    }

    fn accept_session(&mut self, peer: PeerId) {
        self.accepted.push(peer);
    }

    fn set_group_joinable(&mut self, group: GroupId, joinable: bool) {
        if let Some(state) = self.groups.get_mut(&group) {
            state.joinable = joinable;
        }
    }

    fn set_group_metadata(&mut self, group: GroupId, key: &str, value: &str) {
        if let Some(state) = self.groups.get_mut(&group) {
            state.metadata.insert(key.to_string(), value.to_string());
        }
    }

    fn enable_relay_fallback(&mut self) {
        self.relay_enabled = true;
    }
}
