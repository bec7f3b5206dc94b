//! Error types
//!
//! The protocol engines never fail (corruption, loss and stray events are
//! absorbed as no-ops); errors only arise while building messages and while
//! loading run configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PacketError {
    #[error("message is {len} bytes, payload holds at most {max}")]
    MessageTooLong { len: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("window size must be at least 1")]
    ZeroWindow,

    #[error("timeout must be positive")]
    ZeroTimeout,

    #[error("min delay {min_ms}ms exceeds max delay {max_ms}ms")]
    DelayRange { min_ms: u64, max_ms: u64 },

    #[error("a channel that drops or corrupts everything never drains; set until_ms or max_retransmits")]
    NeverTerminates,

    #[error("unknown protocol `{0}` (expected abt, gbn or sr)")]
    UnknownProtocol(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid run spec: {0}")]
    Json(#[from] serde_json::Error),
}
