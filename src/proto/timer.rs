//! Retransmission timer policy
//!
//! Every variant runs a single logical timer per sender. [`RetransmitTimer`]
//! wraps the harness timer so that start/stop are idempotent from the engine's
//! side, and counts expiries without progress for the optional retry ceiling.
//! [`RetransmitScope`] decides what goes back on the wire when it fires.

use tracing::{debug, warn};

use super::ProtoConfig;
use super::window::SendWindow;
use crate::net::{Entity, NetApi, SeqNum};
use crate::sim::SimTime;

/// What to retransmit on expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetransmitScope {
    /// The single most recently sent packet (alternating bit).
    LastSent,
    /// Every unacknowledged packet from `base` to `next_seq - 1` (go-back-N).
    Window,
    /// Only the oldest unacknowledged packet (selective repeat).
    Oldest,
}

impl RetransmitScope {
    /// Sequence numbers to resend, oldest first.
    pub fn select(self, window: &SendWindow) -> Vec<SeqNum> {
        match self {
            RetransmitScope::LastSent => window.unacked().last().into_iter().collect(),
            RetransmitScope::Window => window.unacked().collect(),
            RetransmitScope::Oldest => window.unacked().next().into_iter().collect(),
        }
    }
}

/// Outcome of a timer expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Retransmit,
    /// The retry ceiling was exceeded.
    GiveUp,
}

#[derive(Debug)]
pub struct RetransmitTimer {
    entity: Entity,
    timeout: SimTime,
    max_retransmits: Option<u32>,
    running: bool,
    /// Consecutive expiries since the window last moved.
    expiries: u32,
}

impl RetransmitTimer {
    pub fn new(entity: Entity, cfg: &ProtoConfig) -> Self {
        Self {
            entity,
            timeout: cfg.timeout,
            max_retransmits: cfg.max_retransmits,
            running: false,
            expiries: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn expiries(&self) -> u32 {
        self.expiries
    }

    /// Arm the timer unless it is already running.
    pub fn start(&mut self, api: &mut dyn NetApi) {
        if self.running {
            return;
        }
        self.running = true;
        api.start_timer(self.entity, self.timeout);
    }

    /// Disarm the timer if it is running.
    pub fn stop(&mut self, api: &mut dyn NetApi) {
        if !self.running {
            return;
        }
        self.running = false;
        api.stop_timer(self.entity);
    }

    pub fn restart(&mut self, api: &mut dyn NetApi) {
        self.stop(api);
        self.start(api);
    }

    /// The window moved. Forget earlier expiries, then re-arm for the new
    /// oldest packet if anything is still outstanding.
    pub fn on_progress(&mut self, outstanding: bool, api: &mut dyn NetApi) {
        self.expiries = 0;
        self.stop(api);
        if outstanding {
            self.start(api);
        }
    }

    /// The harness timer fired; it is no longer running.
    pub fn on_expiry(&mut self) -> Expiry {
        self.running = false;
        self.expiries = self.expiries.saturating_add(1);
        match self.max_retransmits {
            Some(max) if self.expiries > max => {
                warn!(entity = %self.entity, expiries = self.expiries, max, "retry ceiling exceeded");
                Expiry::GiveUp
            }
            _ => {
                debug!(entity = %self.entity, expiries = self.expiries, "timer expired");
                Expiry::Retransmit
            }
        }
    }

    /// Forget all state without touching the harness (used by `init`).
    pub fn reset(&mut self) {
        self.running = false;
        self.expiries = 0;
    }
}
