//! 可靠传输协议引擎
//!
//! 在保序、有丢包和损坏的信道上实现三种 ARQ：
//! - 交替位（停等，窗口为 1，序列号模 2）
//! - 回退 N（累积确认，单定时器，接收端丢弃乱序分组）
//! - 选择重传（逐包确认，接收端缓存乱序分组）
//!
//! 引擎只响应事件，并通过 [`NetApi`] 发出请求；不持有时钟、随机数或 I/O。
//! ACK 分组的 `ack` 字段总是被确认的序列号。

pub mod abt;
mod delivery;
pub mod gbn;
mod pending;
pub mod sr;
mod timer;
mod window;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::net::{Entity, Message, NetApi, Packet, SeqNum};
use crate::sim::SimTime;

pub use delivery::{Arrival, DeliveryTracker};
pub use pending::PendingQueue;
pub use timer::{Expiry, RetransmitScope, RetransmitTimer};
pub use window::{SendWindow, SentRecord, Window};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Abt,
    Gbn,
    Sr,
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "abt" | "alternating_bit" => Ok(Protocol::Abt),
            "gbn" | "go_back_n" => Ok(Protocol::Gbn),
            "sr" | "selective_repeat" => Ok(Protocol::Sr),
            _ => Err(ConfigError::UnknownProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protocol::Abt => "abt",
            Protocol::Gbn => "gbn",
            Protocol::Sr => "sr",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProtoConfig {
    /// Sender window and (selective repeat) receive buffer size.
    pub window_size: usize,
    /// Retransmission timeout.
    pub timeout: SimTime,
    /// Give up after this many consecutive retransmission rounds without
    /// progress. `None` retries forever.
    pub max_retransmits: Option<u32>,
}

impl Default for ProtoConfig {
    fn default() -> Self {
        Self {
            window_size: 8,
            timeout: SimTime::from_millis(30),
            max_retransmits: None,
        }
    }
}

impl ProtoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.timeout == SimTime::ZERO {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Sender-side state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderState {
    /// The window has room for a new application message.
    AwaitingApplicationData,
    /// The window is full; waiting for an acknowledgment (timer running).
    AwaitingAcknowledgment,
    /// The retry ceiling was hit. Messages are queued but nothing is sent
    /// until `init`.
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderStats {
    /// First transmissions of application messages.
    pub sent: u64,
    pub retransmitted: u64,
    /// Messages that had to wait in the pending queue.
    pub queued: u64,
    pub acks_accepted: u64,
    /// Corrupted, duplicate or out-of-window acknowledgments.
    pub acks_ignored: u64,
    pub timeouts: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Monotonic count of payloads handed to the application.
    pub delivered: u64,
    pub acks_sent: u64,
    pub corrupted: u64,
    /// Valid packets that were not new (already delivered or buffered).
    pub duplicates: u64,
    /// Out-of-order packets held for later release.
    pub buffered: u64,
    pub out_of_window: u64,
}

/// Sender engine driven by the harness, one event at a time.
pub trait SenderEngine: fmt::Debug {
    /// Reset to `base = next_seq = 0`, no pending messages, timer stopped.
    fn init(&mut self, api: &mut dyn NetApi);
    fn on_app_send(&mut self, msg: Message, api: &mut dyn NetApi);
    fn on_packet(&mut self, pkt: Packet, api: &mut dyn NetApi);
    fn on_timer(&mut self, api: &mut dyn NetApi);

    fn state(&self) -> SenderState;
    fn window(&self) -> Window;
    fn pending_len(&self) -> usize;
    fn stats(&self) -> &SenderStats;
}

/// Receiver engine; only ever sees packet arrivals.
pub trait ReceiverEngine: fmt::Debug {
    /// Reset to `expected = 0` with an empty receive buffer.
    fn init(&mut self);
    fn on_packet(&mut self, pkt: Packet, api: &mut dyn NetApi);

    fn expected_seq(&self) -> SeqNum;
    fn delivered_count(&self) -> u64 {
        self.stats().delivered
    }
    fn stats(&self) -> &ReceiverStats;
}

pub type Endpoints = (Box<dyn SenderEngine>, Box<dyn ReceiverEngine>);

/// Build the sender (entity A) and receiver (entity B) for `protocol`.
pub fn build(protocol: Protocol, cfg: &ProtoConfig) -> Result<Endpoints, ConfigError> {
    cfg.validate()?;
    let endpoints: Endpoints = match protocol {
        Protocol::Abt => (
            Box::new(abt::AbtSender::new(Entity::A, cfg)),
            Box::new(abt::AbtReceiver::new(Entity::B)),
        ),
        Protocol::Gbn => (
            Box::new(gbn::GbnSender::new(Entity::A, cfg)),
            Box::new(gbn::GbnReceiver::new(Entity::B)),
        ),
        Protocol::Sr => (
            Box::new(sr::SrSender::new(Entity::A, cfg)),
            Box::new(sr::SrReceiver::new(Entity::B, cfg.window_size)),
        ),
    };
    Ok(endpoints)
}
