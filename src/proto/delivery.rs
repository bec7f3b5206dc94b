//! Receiver delivery tracker
//!
//! Tracks the next in-order sequence number and, for windows larger than one,
//! holds out-of-order packets in a slot array indexed by `seq % size`. Only
//! sequence numbers in `[expected, expected + size)` are ever stored, so two
//! live packets can never share a slot.

use crate::net::{Packet, SeqNum};

/// How an arriving packet relates to the receive window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// New and inside the window; now buffered.
    Buffered,
    /// Inside the window but already buffered.
    Duplicate,
    /// Within one window below `expected`: already delivered.
    Stale,
    OutOfWindow,
}

#[derive(Debug)]
pub struct DeliveryTracker {
    expected: SeqNum,
    slots: Vec<Option<Packet>>,
}

impl DeliveryTracker {
    pub fn new(size: usize) -> Self {
        Self {
            expected: 0,
            slots: vec![None; size.max(1)],
        }
    }

    pub fn expected(&self) -> SeqNum {
        self.expected
    }

    /// Sequence number of the most recent in-order delivery.
    pub fn last_delivered(&self) -> Option<SeqNum> {
        self.expected.checked_sub(1)
    }

    fn slot(&self, seq: SeqNum) -> usize {
        (seq % self.slots.len() as u64) as usize
    }

    pub fn in_window(&self, seq: SeqNum) -> bool {
        seq >= self.expected && seq - self.expected < self.slots.len() as u64
    }

    pub fn classify(&self, seq: SeqNum) -> Arrival {
        if self.in_window(seq) {
            match &self.slots[self.slot(seq)] {
                Some(p) if p.seq == seq => Arrival::Duplicate,
                _ => Arrival::Buffered,
            }
        } else if seq < self.expected && self.expected - seq <= self.slots.len() as u64 {
            Arrival::Stale
        } else {
            Arrival::OutOfWindow
        }
    }

    /// Buffer `pkt` if it is new and inside the window.
    pub fn offer(&mut self, pkt: Packet) -> Arrival {
        let arrival = self.classify(pkt.seq);
        if arrival == Arrival::Buffered {
            let i = self.slot(pkt.seq);
            self.slots[i] = Some(pkt);
        }
        arrival
    }

    /// Take every buffered packet contiguous with `expected`, in order,
    /// advancing `expected` past each.
    pub fn release(&mut self) -> Vec<Packet> {
        let mut out = Vec::new();
        loop {
            let i = self.slot(self.expected);
            match self.slots[i].take() {
                Some(p) if p.seq == self.expected => {
                    self.expected += 1;
                    out.push(p);
                }
                other => {
                    self.slots[i] = other;
                    break;
                }
            }
        }
        out
    }

    /// Count one in-order delivery made without buffering.
    pub fn advance(&mut self) {
        self.expected += 1;
    }

    pub fn buffered(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.expected = 0;
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}
