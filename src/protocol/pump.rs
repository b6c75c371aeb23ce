//! # Packet Pump
//!
//! Bounded per-tick drain of inbound packets.
//!
//! Once per tick the pump pulls pending byte buffers off the transport,
//! decodes each into a [`Message`], and fans it out through the
//! [`Dispatcher`]. The reserved `"handshake"` tag additionally announces the
//! new member and triggers a membership refresh.
//!
//! The drain is a loop with a hard iteration bound, not a recursion: the
//! bound caps per-tick work under burst load, and whatever remains stays
//! buffered in the transport until the next tick. A packet that fails to
//! decode is logged and skipped; one bad packet never aborts the rest of the
//! queue.

use tracing::{info, warn};

use crate::config::HANDSHAKE_TAG;
use crate::core::message::GroupId;
use crate::core::serialization;
use crate::protocol::dispatcher::Dispatcher;
use crate::protocol::membership::MembershipTracker;
use crate::transport::Transport;

/// What one drain call accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Packets pulled off the transport (decoded or not).
    pub processed: usize,
    /// Subscriber invocations across all dispatched messages.
    pub dispatched: usize,
    /// Packets that failed to decode and were skipped.
    pub decode_errors: usize,
}

/// Drives the bounded inbound drain. Stateless between ticks; the transport
/// owns any backlog.
pub struct PacketPump {
    max_packets: usize,
}

impl PacketPump {
    pub fn new(max_packets: usize) -> Self {
        Self { max_packets }
    }

    pub fn max_packets(&self) -> usize {
        self.max_packets
    }

    /// Drain up to `max_packets` inbound packets for this tick.
    ///
    /// No-ops when the transport is not ready.
    pub fn drain<T: Transport>(
        &self,
        transport: &mut T,
        dispatcher: &Dispatcher,
        membership: &mut MembershipTracker,
        group: GroupId,
    ) -> DrainReport {
        let mut report = DrainReport::default();

        if !transport.is_ready() {
            return report;
        }

        while report.processed < self.max_packets {
            let Some(bytes) = transport.poll_bytes() else {
                break;
            };
            report.processed += 1;

            let msg = match serialization::decode(&bytes) {
                Ok(msg) => msg,
                Err(e) => {
                    warn!(
                        target: "peer_session::pump",
                        error = %e,
                        len = bytes.len(),
                        "dropping undecodable packet"
                    );
                    report.decode_errors += 1;
                    continue;
                }
            };

            if msg.tag == HANDSHAKE_TAG {
                info!(
                    target: "peer_session::pump",
                    peer = %msg.sender_id,
                    name = %msg.sender_name,
                    "handshake received, refreshing membership"
                );
                membership.refresh(transport, group);
            }

            match dispatcher.dispatch(&msg) {
                Ok(delivered) => report.dispatched += delivered,
                Err(e) => {
                    warn!(target: "peer_session::pump", error = %e, tag = %msg.tag, "dispatch failed");
                }
            }
        }

        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::core::message::{Message, PeerId};
    use crate::core::serialization::{encode, SerializationFormat};
    use crate::transport::LoopbackTransport;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn queue_message(t: &mut LoopbackTransport, tag: &str, from: PeerId) {
        let mut msg = Message::new(tag);
        msg.sender_id = from;
        msg.sender_name = format!("peer-{from}");
        let bytes = encode(&msg, SerializationFormat::Bincode).unwrap();
        t.queue_inbound(bytes);
    }

    #[test]
    fn drain_respects_bound_and_leaves_remainder() {
        let mut t = LoopbackTransport::new(PeerId(1), "host");
        for _ in 0..40 {
            queue_message(&mut t, "message", PeerId(2));
        }

        let pump = PacketPump::new(32);
        let dispatcher = Dispatcher::new();
        let mut membership = MembershipTracker::new();

        let report = pump.drain(&mut t, &dispatcher, &mut membership, GroupId(42));
        assert_eq!(report.processed, 32);
        assert_eq!(t.pending_inbound(), 8);

        let report = pump.drain(&mut t, &dispatcher, &mut membership, GroupId(42));
        assert_eq!(report.processed, 8);
        assert_eq!(t.pending_inbound(), 0);
    }

    #[test]
    fn one_bad_packet_does_not_poison_the_queue() {
        let mut t = LoopbackTransport::new(PeerId(1), "host");
        queue_message(&mut t, "message", PeerId(2));
        queue_message(&mut t, "message", PeerId(2));
        t.queue_inbound(Bytes::from_static(&[0xFF, 0xAA, 0x55]));
        queue_message(&mut t, "message", PeerId(2));
        queue_message(&mut t, "message", PeerId(2));

        let pump = PacketPump::new(32);
        let dispatcher = Dispatcher::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        let sink = delivered.clone();
        dispatcher
            .subscribe("message", move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        let mut membership = MembershipTracker::new();

        let report = pump.drain(&mut t, &dispatcher, &mut membership, GroupId(42));
        assert_eq!(report.processed, 5);
        assert_eq!(report.decode_errors, 1);
        assert_eq!(delivered.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn handshake_triggers_membership_refresh_and_reaches_subscribers() {
        let mut t = LoopbackTransport::new(PeerId(1), "host");
        t.register_peer(PeerId(2), "newcomer");
        t.seed_group(GroupId(42), 8, vec![PeerId(1), PeerId(2)]);
        queue_message(&mut t, "handshake", PeerId(2));

        let pump = PacketPump::new(32);
        let dispatcher = Dispatcher::new();
        let greeted = Arc::new(AtomicUsize::new(0));
        let sink = greeted.clone();
        dispatcher
            .subscribe("handshake", move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        let mut membership = MembershipTracker::new();

        pump.drain(&mut t, &dispatcher, &mut membership, GroupId(42));
        assert_eq!(membership.len(), 2);
        assert_eq!(greeted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn not_ready_transport_drains_nothing() {
        let mut t = LoopbackTransport::new(PeerId(1), "host");
        queue_message(&mut t, "message", PeerId(2));
        t.set_ready(false);

        let pump = PacketPump::new(32);
        let dispatcher = Dispatcher::new();
        let mut membership = MembershipTracker::new();

        let report = pump.drain(&mut t, &dispatcher, &mut membership, GroupId(42));
        assert_eq!(report, DrainReport::default());
    }
}
