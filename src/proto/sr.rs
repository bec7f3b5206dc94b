//! Selective repeat
//!
//! Every data packet is acknowledged individually. The sender keeps one
//! coalesced timer for the oldest unacknowledged packet and resends only that
//! packet on expiry. The receiver buffers packets inside
//! `[expected, expected + N)` and releases them in order; packets from the
//! previous window are re-acknowledged because their first ACK may have been
//! lost.

use tracing::{debug, trace};

use super::delivery::{Arrival, DeliveryTracker};
use super::pending::PendingQueue;
use super::timer::{Expiry, RetransmitScope, RetransmitTimer};
use super::window::{SendWindow, SentRecord, Window};
use super::{ProtoConfig, ReceiverEngine, ReceiverStats, SenderEngine, SenderState, SenderStats};
use crate::net::{Entity, Message, NetApi, Packet, SeqNum};

#[derive(Debug)]
pub struct SrSender {
    entity: Entity,
    window: SendWindow,
    pending: PendingQueue,
    timer: RetransmitTimer,
    failed: bool,
    stats: SenderStats,
}

impl SrSender {
    pub fn new(entity: Entity, cfg: &ProtoConfig) -> Self {
        Self {
            entity,
            window: SendWindow::new(cfg.window_size),
            pending: PendingQueue::default(),
            timer: RetransmitTimer::new(entity, cfg),
            failed: false,
            stats: SenderStats::default(),
        }
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn record(&self, seq: SeqNum) -> Option<&SentRecord> {
        self.window.get(seq)
    }

    fn send_new(&mut self, msg: Message, api: &mut dyn NetApi) {
        let seq = self.window.next_seq();
        let pkt = Packet::data(seq, &msg);
        if self.window.push(pkt.clone(), api.now()).is_none() {
            self.pending.push(msg);
            return;
        }
        debug!(entity = %self.entity, seq, msg = %msg, "send");
        api.transmit(self.entity, pkt);
        self.stats.sent += 1;
        self.timer.start(api);
    }

    fn flush_pending(&mut self, api: &mut dyn NetApi) {
        while self.window.has_capacity() {
            let Some(msg) = self.pending.pop() else {
                break;
            };
            self.send_new(msg, api);
        }
    }

    fn ignore(&mut self, why: &'static str) {
        trace!(entity = %self.entity, why, "ack ignored");
        self.stats.acks_ignored += 1;
    }
}

impl SenderEngine for SrSender {
    fn init(&mut self, api: &mut dyn NetApi) {
        self.window.clear();
        self.pending.clear();
        self.timer.stop(api);
        self.timer.reset();
        self.failed = false;
    }

    fn on_app_send(&mut self, msg: Message, api: &mut dyn NetApi) {
        if self.failed || !self.window.has_capacity() {
            debug!(entity = %self.entity, msg = %msg, queued = self.pending.len() + 1, "window full, queue");
            self.pending.push(msg);
            self.stats.queued += 1;
            return;
        }
        self.send_new(msg, api);
    }

    #[tracing::instrument(skip_all, fields(entity = %self.entity, ack = pkt.ack))]
    fn on_packet(&mut self, pkt: Packet, api: &mut dyn NetApi) {
        if self.failed {
            return self.ignore("failed");
        }
        if !pkt.is_valid() {
            return self.ignore("corrupted");
        }
        if !self.window.mark_acked(pkt.ack) {
            return self.ignore("outside window or already acked");
        }
        self.stats.acks_accepted += 1;

        let slid = if pkt.ack == self.window.base() {
            self.window.slide()
        } else {
            0
        };

        if slid > 0 {
            debug!(slid, base = self.window.base(), next_seq = self.window.next_seq(), "window advanced");
            self.timer.on_progress(!self.window.is_empty(), api);
            self.flush_pending(api);
        } else {
            // base is still outstanding
            self.timer.restart(api);
        }
    }

    fn on_timer(&mut self, api: &mut dyn NetApi) {
        if self.failed || self.window.is_empty() {
            trace!(entity = %self.entity, "stray timer");
            return;
        }
        self.stats.timeouts += 1;
        if self.timer.on_expiry() == Expiry::GiveUp {
            self.failed = true;
            return;
        }
        let now = api.now();
        for seq in RetransmitScope::Oldest.select(&self.window) {
            if let Some(pkt) = self.window.retransmit(seq, now) {
                debug!(entity = %self.entity, seq, "retransmit oldest");
                api.transmit(self.entity, pkt);
                self.stats.retransmitted += 1;
            }
        }
        self.timer.start(api);
    }

    fn state(&self) -> SenderState {
        if self.failed {
            SenderState::Failed
        } else if self.window.has_capacity() {
            SenderState::AwaitingApplicationData
        } else {
            SenderState::AwaitingAcknowledgment
        }
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
pub struct SrReceiver {
    entity: Entity,
    tracker: DeliveryTracker,
    /// Last ACK sent, repeated when a corrupted packet arrives.
    last_ack: Option<SeqNum>,
    stats: ReceiverStats,
}

impl SrReceiver {
    pub fn new(entity: Entity, window_size: usize) -> Self {
        Self {
            entity,
            tracker: DeliveryTracker::new(window_size),
            last_ack: None,
            stats: ReceiverStats::default(),
        }
    }

    pub fn buffered(&self) -> usize {
        self.tracker.buffered()
    }

    fn send_ack(&mut self, ack: SeqNum, api: &mut dyn NetApi) {
        api.transmit(self.entity, Packet::ack(ack));
        self.last_ack = Some(ack);
        self.stats.acks_sent += 1;
    }
}

impl ReceiverEngine for SrReceiver {
    fn init(&mut self) {
        self.tracker.clear();
        self.last_ack = None;
    }

    #[tracing::instrument(skip_all, fields(entity = %self.entity, seq = pkt.seq))]
    fn on_packet(&mut self, pkt: Packet, api: &mut dyn NetApi) {
        if !pkt.is_valid() {
            self.stats.corrupted += 1;
            if let Some(last) = self.last_ack {
                debug!(last, "corrupted, repeat last ack");
                self.send_ack(last, api);
            }
            return;
        }

        let seq = pkt.seq;
        match self.tracker.offer(pkt) {
            Arrival::Buffered => {
                self.send_ack(seq, api);
                if seq != self.tracker.expected() {
                    debug!(expected = self.tracker.expected(), "out of order, buffered");
                    self.stats.buffered += 1;
                }
            }
            Arrival::Duplicate | Arrival::Stale => {
                debug!("duplicate, re-ack");
                self.stats.duplicates += 1;
                self.send_ack(seq, api);
            }
            Arrival::OutOfWindow => {
                trace!(expected = self.tracker.expected(), "outside receive window, ignore");
                self.stats.out_of_window += 1;
            }
        }

        for p in self.tracker.release() {
            let msg = p.message();
            debug!(seq = p.seq, msg = %msg, "deliver");
            api.deliver(self.entity, msg);
            self.stats.delivered += 1;
        }
    }

    fn expected_seq(&self) -> SeqNum {
        self.tracker.expected()
    }

    fn stats(&self) -> &ReceiverStats {
        &self.stats
    }
}
