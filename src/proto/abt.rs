//! Alternating-bit protocol (stop-and-wait)
//!
//! One packet in flight at a time. Wire sequence numbers alias the sender's
//! counter to `{0, 1}`. The receiver answers corrupted and duplicate packets
//! by repeating the ACK for the last bit it accepted.

use tracing::{debug, trace};

use super::delivery::DeliveryTracker;
use super::pending::PendingQueue;
use super::timer::{Expiry, RetransmitScope, RetransmitTimer};
use super::window::{SendWindow, Window};
use super::{ProtoConfig, ReceiverEngine, ReceiverStats, SenderEngine, SenderState, SenderStats};
use crate::net::{Entity, Message, NetApi, Packet, SeqNum};

fn bit(seq: SeqNum) -> SeqNum {
    seq % 2
}

#[derive(Debug)]
pub struct AbtSender {
    entity: Entity,
    state: SenderState,
    /// Window of one; records are keyed by the unaliased counter.
    window: SendWindow,
    pending: PendingQueue,
    timer: RetransmitTimer,
    stats: SenderStats,
}

impl AbtSender {
    /// `cfg.window_size` is ignored; stop-and-wait always uses 1.
    pub fn new(entity: Entity, cfg: &ProtoConfig) -> Self {
        Self {
            entity,
            state: SenderState::AwaitingApplicationData,
            window: SendWindow::new(1),
            pending: PendingQueue::default(),
            timer: RetransmitTimer::new(entity, cfg),
            stats: SenderStats::default(),
        }
    }

    /// Bit the receiver must acknowledge next.
    pub fn current_bit(&self) -> SeqNum {
        bit(self.window.base())
    }

    fn send_new(&mut self, msg: Message, api: &mut dyn NetApi) {
        let pkt = Packet::data(bit(self.window.next_seq()), &msg);
        if self.window.push(pkt.clone(), api.now()).is_none() {
            self.pending.push(msg);
            return;
        }
        debug!(entity = %self.entity, bit = pkt.seq, msg = %msg, "send");
        api.transmit(self.entity, pkt);
        self.stats.sent += 1;
        self.timer.start(api);
        self.state = SenderState::AwaitingAcknowledgment;
    }

    fn ignore(&mut self, why: &'static str) {
        trace!(entity = %self.entity, why, "ack ignored");
        self.stats.acks_ignored += 1;
    }
}

impl SenderEngine for AbtSender {
    fn init(&mut self, api: &mut dyn NetApi) {
        self.state = SenderState::AwaitingApplicationData;
        self.window.clear();
        self.pending.clear();
        self.timer.stop(api);
        self.timer.reset();
    }

    fn on_app_send(&mut self, msg: Message, api: &mut dyn NetApi) {
        match self.state {
            SenderState::AwaitingApplicationData => self.send_new(msg, api),
            SenderState::AwaitingAcknowledgment | SenderState::Failed => {
                debug!(entity = %self.entity, msg = %msg, queued = self.pending.len() + 1, "busy, queue");
                self.pending.push(msg);
                self.stats.queued += 1;
            }
        }
    }

    #[tracing::instrument(skip_all, fields(entity = %self.entity, ack = pkt.ack))]
    fn on_packet(&mut self, pkt: Packet, api: &mut dyn NetApi) {
        if self.state != SenderState::AwaitingAcknowledgment {
            return self.ignore("not awaiting ack");
        }
        if !pkt.is_valid() {
            return self.ignore("corrupted");
        }
        if pkt.ack != self.current_bit() {
            return self.ignore("wrong bit");
        }

        self.window.ack_through(self.window.base());
        self.stats.acks_accepted += 1;
        self.timer.on_progress(false, api);
        self.state = SenderState::AwaitingApplicationData;
        debug!(next_bit = self.current_bit(), "acked");

        if let Some(msg) = self.pending.pop() {
            self.send_new(msg, api);
        }
    }

    fn on_timer(&mut self, api: &mut dyn NetApi) {
        if self.state != SenderState::AwaitingAcknowledgment {
            trace!(entity = %self.entity, state = ?self.state, "stray timer");
            return;
        }
        self.stats.timeouts += 1;
        if self.timer.on_expiry() == Expiry::GiveUp {
            self.state = SenderState::Failed;
            return;
        }
        let now = api.now();
        for seq in RetransmitScope::LastSent.select(&self.window) {
            if let Some(pkt) = self.window.retransmit(seq, now) {
                debug!(entity = %self.entity, bit = pkt.seq, "retransmit");
                api.transmit(self.entity, pkt);
                self.stats.retransmitted += 1;
            }
        }
        self.timer.start(api);
    }

    fn state(&self) -> SenderState {
        self.state
    }

    fn window(&self) -> Window {
        self.window.bounds()
    }

    fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn stats(&self) -> &SenderStats {
        &self.stats
    }
}

#[derive(Debug)]
pub struct AbtReceiver {
    entity: Entity,
    tracker: DeliveryTracker,
    stats: ReceiverStats,
}

impl AbtReceiver {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            tracker: DeliveryTracker::new(1),
            stats: ReceiverStats::default(),
        }
    }

    /// Bit the receiver accepts next.
    pub fn expected_bit(&self) -> SeqNum {
        bit(self.tracker.expected())
    }

    fn send_ack(&mut self, ack: SeqNum, api: &mut dyn NetApi) {
        api.transmit(self.entity, Packet::ack(ack));
        self.stats.acks_sent += 1;
    }

    /// Repeat the ACK for the last accepted bit. Before anything was accepted
    /// this is the bit opposite to the expected one, which the sender ignores.
    fn ack_last(&mut self, api: &mut dyn NetApi) {
        let last = bit(self.tracker.expected() + 1);
        self.send_ack(last, api);
    }
}

impl ReceiverEngine for AbtReceiver {
    fn init(&mut self) {
        self.tracker.clear();
    }

    #[tracing::instrument(skip_all, fields(entity = %self.entity, seq = pkt.seq))]
    fn on_packet(&mut self, pkt: Packet, api: &mut dyn NetApi) {
        if !pkt.is_valid() {
            debug!("corrupted, repeat last ack");
            self.stats.corrupted += 1;
            return self.ack_last(api);
        }
        if pkt.seq != self.expected_bit() {
            debug!(expected = self.expected_bit(), "duplicate, repeat last ack");
            self.stats.duplicates += 1;
            return self.ack_last(api);
        }

        let msg = pkt.message();
        debug!(msg = %msg, "deliver");
        api.deliver(self.entity, msg);
        self.stats.delivered += 1;
        self.tracker.advance();
        self.send_ack(pkt.seq, api);
    }

    fn expected_seq(&self) -> SeqNum {
        self.tracker.expected()
    }

    fn stats(&self) -> &ReceiverStats {
        &self.stats
    }
}
