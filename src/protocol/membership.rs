//! # Membership Tracking
//!
//! Authoritative view of the active group's member list.
//!
//! Refresh is a wholesale replace: the tracker queries the transport for the
//! full member list, resolves every display name, builds the new list, then
//! swaps it in. Observers only ever see a complete list, old or new, never a
//! partial one. There is no incremental diffing.

use tracing::{debug, info};

use crate::core::message::{GroupId, Member};
use crate::transport::Transport;

type MembershipObserver = dyn Fn(&[Member]) + Send + Sync + 'static;

/// Tracks the current group's members and notifies observers on change.
#[derive(Default)]
pub struct MembershipTracker {
    members: Vec<Member>,
    observers: Vec<Box<MembershipObserver>>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer called with the full list after every refresh.
    pub fn observe<F>(&mut self, observer: F)
    where
        F: Fn(&[Member]) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Rebuild the member list from the transport.
    ///
    /// Members come back in transport index order, names resolved one lookup
    /// per member per refresh. The previous list is replaced in one step.
    pub fn refresh<T: Transport>(&mut self, transport: &T, group: GroupId) -> &[Member] {
        let ids = transport.list_members(group);
        let fresh: Vec<Member> = ids
            .into_iter()
            .map(|id| Member {
                id,
                name: transport.resolve_name(id),
            })
            .collect();

        debug!(
            target: "peer_session::membership",
            group = %group,
            count = fresh.len(),
            "membership refreshed"
        );

        self.members = fresh;
        for observer in &self.observers {
            observer(&self.members);
        }
        &self.members
    }

    /// Drop all members, e.g. after leaving a group.
    pub fn clear(&mut self) {
        if !self.members.is_empty() {
            info!(target: "peer_session::membership", "membership cleared");
        }
        self.members.clear();
        for observer in &self.observers {
            observer(&self.members);
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
