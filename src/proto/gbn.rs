//! Go-back-N
//!
//! Cumulative acknowledgments and a single timer that always tracks the oldest
//! outstanding packet. On expiry the whole unacknowledged window is resent.
//! The receiver accepts only the next in-order packet; anything else is
//! answered with the ACK for the last in-order delivery. Corrupted packets
//! are dropped without an answer.

use tracing::{debug, trace};

use super::delivery::{Arrival, DeliveryTracker};
use super::pending::PendingQueue;
use super::timer::{Expiry, RetransmitScope, RetransmitTimer};
use super::window::{SendWindow, Window};
use super::{ProtoConfig, ReceiverEngine, ReceiverStats, SenderEngine, SenderState, SenderStats};
use crate::net::{Entity, Message, NetApi, Packet, SeqNum};

#[derive(Debug)]
pub struct GbnSender {
    entity: Entity,
    window: SendWindow,
    pending: PendingQueue,
    timer: RetransmitTimer,
    failed: bool,
    stats: SenderStats,
}

impl GbnSender {
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

impl SenderEngine for GbnSender {
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
        // base <= ack < next_seq, everything else is stale or bogus
        let slid = self.window.ack_through(pkt.ack);
        if slid == 0 {
            return self.ignore("outside window");
        }

        self.stats.acks_accepted += 1;
        debug!(slid, base = self.window.base(), next_seq = self.window.next_seq(), "window advanced");
        self.timer.on_progress(!self.window.is_empty(), api);
        self.flush_pending(api);
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
        let resend = RetransmitScope::Window.select(&self.window);
        debug!(entity = %self.entity, from = self.window.base(), count = resend.len(), "go back");
        for seq in resend {
            if let Some(pkt) = self.window.retransmit(seq, now) {
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
pub struct GbnReceiver {
    entity: Entity,
    tracker: DeliveryTracker,
    stats: ReceiverStats,
}

impl GbnReceiver {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            tracker: DeliveryTracker::new(1),
            stats: ReceiverStats::default(),
        }
    }

    fn send_ack(&mut self, ack: SeqNum, api: &mut dyn NetApi) {
        api.transmit(self.entity, Packet::ack(ack));
        self.stats.acks_sent += 1;
    }
}

impl ReceiverEngine for GbnReceiver {
    fn init(&mut self) {
        self.tracker.clear();
    }

    #[tracing::instrument(skip_all, fields(entity = %self.entity, seq = pkt.seq))]
    fn on_packet(&mut self, pkt: Packet, api: &mut dyn NetApi) {
        if !pkt.is_valid() {
            debug!("corrupted, drop");
            self.stats.corrupted += 1;
            return;
        }

        let arrival = self.tracker.offer(pkt);
        if arrival != Arrival::Buffered {
            if arrival == Arrival::Stale {
                self.stats.duplicates += 1;
            } else {
                self.stats.out_of_window += 1;
            }
            // nothing delivered yet means nothing to re-acknowledge
            if let Some(last) = self.tracker.last_delivered() {
                debug!(expected = self.tracker.expected(), "out of order, repeat ack {last}");
                self.send_ack(last, api);
            }
            return;
        }

        for p in self.tracker.release() {
            let msg = p.message();
            debug!(seq = p.seq, msg = %msg, "deliver");
            api.deliver(self.entity, msg);
            self.stats.delivered += 1;
            self.send_ack(p.seq, api);
        }
    }

    fn expected_seq(&self) -> SeqNum {
        self.tracker.expected()
    }

    fn stats(&self) -> &ReceiverStats {
        &self.stats
    }
}
