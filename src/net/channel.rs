//! Lossy, corrupting, order-preserving channel
//!
//! Decides the fate of each transmitted packet. Randomness comes from a seeded
//! `StdRng`, so a run is reproducible from its seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::id::Entity;
use super::packet::{PAYLOAD_LEN, Packet};
use crate::sim::SimTime;

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub loss_prob: f64,
    pub corrupt_prob: f64,
    pub min_delay: SimTime,
    pub max_delay: SimTime,
    pub seed: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            loss_prob: 0.0,
            corrupt_prob: 0.0,
            min_delay: SimTime::from_millis(1),
            max_delay: SimTime::from_millis(10),
            seed: 0,
        }
    }
}

/// What happened to a packet handed to the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Lost,
    Arrives { at: SimTime, corrupted: bool },
}

#[derive(Debug)]
pub struct Channel {
    cfg: ChannelConfig,
    rng: StdRng,
    /// Latest scheduled arrival per direction (indexed by sender).
    last_arrival: [SimTime; 2],
}

impl Channel {
    pub fn new(cfg: ChannelConfig) -> Self {
        let rng = StdRng::seed_from_u64(cfg.seed);
        Self {
            cfg,
            rng,
            last_arrival: [SimTime::ZERO; 2],
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.cfg
    }

    /// Roll loss and corruption for `pkt` sent by `from` at `now`. A corrupted
    /// packet is modified in place.
    pub fn send(&mut self, from: Entity, pkt: &mut Packet, now: SimTime) -> Fate {
        if self.roll(self.cfg.loss_prob) {
            return Fate::Lost;
        }
        let corrupted = self.roll(self.cfg.corrupt_prob);
        if corrupted {
            self.corrupt(pkt);
        }

        let (lo, hi) = (self.cfg.min_delay.0, self.cfg.max_delay.0.max(self.cfg.min_delay.0));
        let delay = SimTime(self.rng.gen_range(lo..=hi));
        // never overtake an earlier packet in the same direction
        let dir = from.index();
        let at = now.after(delay).max(self.last_arrival[dir]);
        self.last_arrival[dir] = at;
        Fate::Arrives { at, corrupted }
    }

    fn roll(&mut self, p: f64) -> bool {
        p > 0.0 && self.rng.gen_bool(p.min(1.0))
    }

    /// Flip one bit of one field. Mostly the payload, sometimes a header field.
    fn corrupt(&mut self, pkt: &mut Packet) {
        match self.rng.gen_range(0..8) {
            0..=5 => {
                let i = self.rng.gen_range(0..PAYLOAD_LEN);
                pkt.payload[i] ^= 1u8 << self.rng.gen_range(0..8u32);
                trace!(byte = i, "corrupt payload");
            }
            6 => {
                pkt.seq ^= 1u64 << self.rng.gen_range(0..16u32);
                trace!("corrupt seq");
            }
            _ => {
                pkt.ack ^= 1u64 << self.rng.gen_range(0..16u32);
                trace!("corrupt ack");
            }
        }
    }
}
