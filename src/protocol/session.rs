//! # Session Controller
//!
//! Orchestrates group lifecycle, the handshake protocol, and per-tick
//! processing.
//!
//! ## State Machine
//! ```text
//! Idle -> Creating -> Hosting        (create_group)
//! Idle -> Joining  -> Participating  (join_group)
//! Hosting | Participating -> Idle    (leave_group)
//! ```
//!
//! Transport completions are polled at the start of every tick and applied to
//! completion before any packet draining, so lifecycle handlers never
//! interleave with an in-progress drain. Exactly one group is active per
//! controller at a time; create/join requests while a group is active are
//! rejected with a warning, never a crash.

use tracing::{info, warn};

use crate::config::{SessionConfig, HANDSHAKE_TAG};
use crate::core::message::{GroupId, GroupRole, Member, Message};
use crate::core::serialization;
use crate::error::{Result, SessionError};
use crate::protocol::dispatcher::Dispatcher;
use crate::protocol::membership::MembershipTracker;
use crate::protocol::pump::{DrainReport, PacketPump};
use crate::transport::{ResponseCode, SendTarget, Transport, TransportEvent};

/// Lifecycle states of a session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Group creation requested, completion pending.
    Creating,
    /// Group join requested, completion pending.
    Joining,
    Hosting,
    Participating,
}

/// Owns the transport and drives one group session.
pub struct SessionController<T: Transport> {
    config: SessionConfig,
    transport: T,
    dispatcher: Dispatcher,
    membership: MembershipTracker,
    pump: PacketPump,
    state: SessionState,
    group_id: GroupId,
    role: Option<GroupRole>,
    last_error: Option<SessionError>,
}

impl<T: Transport> SessionController<T> {
    /// Build a controller over an owned transport. Fails on invalid config.
    pub fn new(transport: T, config: SessionConfig) -> Result<Self> {
        config.validate_strict()?;
        let pump = PacketPump::new(config.max_packets_per_tick);
        Ok(Self {
            config,
            transport,
            dispatcher: Dispatcher::new(),
            membership: MembershipTracker::new(),
            pump,
            state: SessionState::Idle,
            group_id: GroupId::NONE,
            role: None,
            last_error: None,
        })
    }

    /// Request creation of a new group with the configured member limit.
    ///
    /// Rejected while any group is active or a request is in flight.
    pub fn create_group(&mut self) -> Result<()> {
        if self.state != SessionState::Idle || !self.group_id.is_none() {
            warn!(
                target: "peer_session::session",
                state = ?self.state,
                group = %self.group_id,
                "create_group rejected, a group is already active"
            );
            return Err(SessionError::GroupAlreadyActive);
        }

        self.transport.create_group(self.config.member_limit)?;
        self.state = SessionState::Creating;
        info!(
            target: "peer_session::session",
            limit = self.config.member_limit,
            "group creation requested"
        );
        Ok(())
    }

    /// Request joining an existing group.
    ///
    /// Rejected while any group is active or a request is in flight.
    pub fn join_group(&mut self, group: GroupId) -> Result<()> {
        if self.state != SessionState::Idle || !self.group_id.is_none() {
            warn!(
                target: "peer_session::session",
                state = ?self.state,
                group = %self.group_id,
                "join_group rejected, a group is already active"
            );
            return Err(SessionError::GroupAlreadyActive);
        }

        self.transport.join_group(group)?;
        self.state = SessionState::Joining;
        info!(target: "peer_session::session", group = %group, "group join requested");
        Ok(())
    }

    /// Leave the active group and return to Idle. No-op when already Idle.
    pub fn leave_group(&mut self) {
        if self.group_id.is_none() {
            return;
        }
        info!(target: "peer_session::session", group = %self.group_id, "leaving group");
        self.transport.leave_group(self.group_id);
        self.group_id = GroupId::NONE;
        self.role = None;
        self.state = SessionState::Idle;
        self.membership.clear();
    }

    /// One cooperative tick: apply all pending transport completions, then
    /// drain inbound packets up to the configured bound.
    ///
    /// No-ops when the transport is not ready.
    pub fn tick(&mut self) -> DrainReport {
        if !self.transport.is_ready() {
            return DrainReport::default();
        }

        while let Some(event) = self.transport.poll_event() {
            self.handle_event(event);
        }

        self.pump.drain(
            &mut self.transport,
            &self.dispatcher,
            &mut self.membership,
            self.group_id,
        )
    }

    fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::GroupCreated { success, group_id } => {
                self.on_group_created(success, group_id)
            }
            TransportEvent::GroupJoined {
                group_id,
                permissions,
                locked,
                response,
            } => self.on_group_joined(group_id, permissions, locked, response),
            TransportEvent::SessionRequested { peer } => {
                // No identity check exists at this layer; every request is
                // accepted. Trust is the transport's problem.
                info!(target: "peer_session::session", peer = %peer, "accepting session request");
                self.transport.accept_session(peer);
            }
        }
    }

    fn on_group_created(&mut self, success: bool, group_id: GroupId) {
        if self.state != SessionState::Creating {
            warn!(
                target: "peer_session::session",
                state = ?self.state,
                "ignoring unexpected group creation completion"
            );
            return;
        }

        if !success {
            warn!(target: "peer_session::session", "group creation failed");
            self.last_error = Some(SessionError::GroupCreationFailed(
                "transport reported failure".to_string(),
            ));
            self.state = SessionState::Idle;
            return;
        }

        self.group_id = group_id;
        self.role = Some(GroupRole::Host);
        self.state = SessionState::Hosting;

        self.transport.set_group_joinable(group_id, true);
        let group_name = self.config.group_name.clone();
        self.transport.set_group_metadata(group_id, "name", &group_name);
        self.transport.enable_relay_fallback();
        self.membership.refresh(&self.transport, group_id);

        info!(
            target: "peer_session::session",
            group = %group_id,
            members = self.membership.len(),
            "hosting group"
        );
    }

    fn on_group_joined(
        &mut self,
        group_id: GroupId,
        permissions: u32,
        locked: bool,
        response: ResponseCode,
    ) {
        if self.state != SessionState::Joining {
            warn!(
                target: "peer_session::session",
                state = ?self.state,
                "ignoring unexpected group join completion"
            );
            return;
        }

        if response != ResponseCode::Success {
            warn!(
                target: "peer_session::session",
                group = %group_id,
                response = ?response,
                "group join failed"
            );
            self.last_error = Some(SessionError::GroupJoinFailed(response));
            self.state = SessionState::Idle;
            return;
        }

        self.group_id = group_id;
        self.role = Some(GroupRole::Participant);
        self.state = SessionState::Participating;
        self.membership.refresh(&self.transport, group_id);

        info!(
            target: "peer_session::session",
            group = %group_id,
            permissions,
            locked,
            members = self.membership.len(),
            "joined group, announcing ourselves"
        );

        if let Err(e) = self.send_message(SendTarget::Broadcast, Message::new(HANDSHAKE_TAG)) {
            warn!(target: "peer_session::session", error = %e, "handshake broadcast failed");
        }
    }

    /// Stamp sender identity, encode, and send a message.
    ///
    /// Fails with [`SessionError::GroupNotActive`] when no group is active.
    pub fn send_message(&mut self, target: SendTarget, mut msg: Message) -> Result<()> {
        if self.group_id.is_none() {
            return Err(SessionError::GroupNotActive);
        }

        let local = self.transport.local_peer();
        msg.sender_id = local;
        msg.sender_name = self.transport.resolve_name(local);

        let bytes = serialization::encode(&msg, self.config.format)?;
        self.transport.send_bytes(target, &bytes)
    }

    /// Register a subscriber for inbound messages carrying `tag`.
    pub fn subscribe<F>(&self, tag: &str, subscriber: F) -> Result<()>
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.dispatcher.subscribe(tag, subscriber)
    }

    /// Register an observer for membership changes.
    pub fn observe_members<F>(&mut self, observer: F)
    where
        F: Fn(&[Member]) + Send + Sync + 'static,
    {
        self.membership.observe(observer);
    }

    /// Force a membership refresh from the transport.
    pub fn refresh_members(&mut self) -> Result<&[Member]> {
        if self.group_id.is_none() {
            return Err(SessionError::GroupNotActive);
        }
        Ok(self.membership.refresh(&self.transport, self.group_id))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn role(&self) -> Option<GroupRole> {
        self.role
    }

    pub fn members(&self) -> &[Member] {
        self.membership.members()
    }

    /// Most recent non-fatal failure surfaced by a lifecycle completion.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
