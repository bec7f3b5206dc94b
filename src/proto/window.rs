//! Sender window tracker
//!
//! In-flight packets live in a ring buffer indexed by `seq - base`, so lookups
//! are bounds-checked and memory stays proportional to the window size no
//! matter how far sequence numbers have grown.

use std::collections::VecDeque;

use crate::net::{Packet, SeqNum};
use crate::sim::SimTime;

/// Snapshot of the sender window bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Oldest unacknowledged sequence number, or `next_seq` if none.
    pub base: SeqNum,
    pub next_seq: SeqNum,
    pub size: usize,
}

impl Window {
    /// `base <= next_seq <= base + size`
    pub fn holds(&self) -> bool {
        self.base <= self.next_seq && self.next_seq - self.base <= self.size as u64
    }

    pub fn in_flight(&self) -> u64 {
        self.next_seq.saturating_sub(self.base)
    }
}

/// One sent, not yet released packet.
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub packet: Packet,
    /// Time of the most recent transmission.
    pub sent_at: SimTime,
    pub acked: bool,
    pub transmissions: u32,
}

#[derive(Debug)]
pub struct SendWindow {
    base: SeqNum,
    size: usize,
    records: VecDeque<SentRecord>,
}

impl SendWindow {
    pub fn new(size: usize) -> Self {
        Self {
            base: 0,
            size,
            records: VecDeque::with_capacity(size),
        }
    }

    pub fn base(&self) -> SeqNum {
        self.base
    }

    pub fn next_seq(&self) -> SeqNum {
        self.base + self.records.len() as u64
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bounds(&self) -> Window {
        Window {
            base: self.base,
            next_seq: self.next_seq(),
            size: self.size,
        }
    }

    pub fn has_capacity(&self) -> bool {
        self.records.len() < self.size
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `base <= seq < next_seq`
    pub fn contains(&self, seq: SeqNum) -> bool {
        seq >= self.base && seq < self.next_seq()
    }

    /// Record `packet` as sent under `next_seq`. Returns the sequence number it
    /// occupies, or `None` (and records nothing) when the window is full.
    pub fn push(&mut self, packet: Packet, now: SimTime) -> Option<SeqNum> {
        if !self.has_capacity() {
            return None;
        }
        let seq = self.next_seq();
        self.records.push_back(SentRecord {
            packet,
            sent_at: now,
            acked: false,
            transmissions: 1,
        });
        Some(seq)
    }

    pub fn get(&self, seq: SeqNum) -> Option<&SentRecord> {
        if !self.contains(seq) {
            return None;
        }
        self.records.get((seq - self.base) as usize)
    }

    fn get_mut(&mut self, seq: SeqNum) -> Option<&mut SentRecord> {
        if !self.contains(seq) {
            return None;
        }
        self.records.get_mut((seq - self.base) as usize)
    }

    /// Cumulative acknowledgment: release everything up to and including `seq`.
    /// Returns how far `base` moved (0 if `seq` is outside the window).
    pub fn ack_through(&mut self, seq: SeqNum) -> usize {
        if !self.contains(seq) {
            return 0;
        }
        let n = (seq - self.base + 1) as usize;
        self.records.drain(..n);
        self.base += n as u64;
        n
    }

    /// Selective acknowledgment of a single record. Returns `false` if `seq`
    /// is outside the window or was already acknowledged.
    pub fn mark_acked(&mut self, seq: SeqNum) -> bool {
        match self.get_mut(seq) {
            Some(rec) if !rec.acked => {
                rec.acked = true;
                true
            }
            _ => false,
        }
    }

    /// Move `base` past every contiguously acknowledged record at the front.
    pub fn slide(&mut self) -> usize {
        let mut n = 0;
        while self.records.front().is_some_and(|r| r.acked) {
            self.records.pop_front();
            n += 1;
        }
        self.base += n as u64;
        n
    }

    /// Unacknowledged sequence numbers, oldest first.
    pub fn unacked(&self) -> impl Iterator<Item = SeqNum> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.acked)
            .map(|(i, _)| self.base + i as u64)
    }

    /// Note a retransmission of `seq` and hand back the packet to resend.
    pub fn retransmit(&mut self, seq: SeqNum, now: SimTime) -> Option<Packet> {
        let rec = self.get_mut(seq)?;
        rec.sent_at = now;
        rec.transmissions = rec.transmissions.saturating_add(1);
        Some(rec.packet.clone())
    }

    pub fn clear(&mut self) {
        self.base = 0;
        self.records.clear();
    }
}
