//! Run specification
//!
//! Everything a single simulated transfer needs: which protocol, how many
//! application messages, channel impairments and timing. Loadable from JSON;
//! every field has a default so partial files are fine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::time::SimTime;
use crate::error::ConfigError;
use crate::net::ChannelConfig;
use crate::proto::{ProtoConfig, Protocol};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSpec {
    pub protocol: Protocol,
    /// Number of application messages A submits.
    pub messages: u64,
    pub loss_prob: f64,
    pub corrupt_prob: f64,
    /// Gap between consecutive application messages.
    pub interval_ms: u64,
    /// One-way channel delay is drawn uniformly from `[min_delay_ms, max_delay_ms]`.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_ms: u64,
    /// Ignored by the alternating-bit protocol, which always uses 1.
    pub window_size: usize,
    pub max_retransmits: Option<u32>,
    pub seed: u64,
    /// Stop the run at this time; `None` runs until no events remain.
    pub until_ms: Option<u64>,
}

impl Default for RunSpec {
    fn default() -> Self {
        Self {
            protocol: Protocol::Gbn,
            messages: 20,
            loss_prob: 0.0,
            corrupt_prob: 0.0,
            interval_ms: 10,
            min_delay_ms: 1,
            max_delay_ms: 10,
            timeout_ms: 30,
            window_size: 8,
            max_retransmits: None,
            seed: 1234,
            until_ms: None,
        }
    }
}

impl RunSpec {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: RunSpec = serde_json::from_str(&raw)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("loss_prob", self.loss_prob), ("corrupt_prob", self.corrupt_prob)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::DelayRange {
                min_ms: self.min_delay_ms,
                max_ms: self.max_delay_ms,
            });
        }
        let hopeless = self.loss_prob >= 1.0 || self.corrupt_prob >= 1.0;
        if hopeless && self.messages > 0 && self.until_ms.is_none() && self.max_retransmits.is_none() {
            return Err(ConfigError::NeverTerminates);
        }
        self.proto_config().validate()
    }

    pub fn proto_config(&self) -> ProtoConfig {
        ProtoConfig {
            window_size: self.window_size,
            timeout: SimTime::from_millis(self.timeout_ms),
            max_retransmits: self.max_retransmits,
        }
    }

    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            loss_prob: self.loss_prob,
            corrupt_prob: self.corrupt_prob,
            min_delay: SimTime::from_millis(self.min_delay_ms),
            max_delay: SimTime::from_millis(self.max_delay_ms),
            seed: self.seed,
        }
    }

    pub fn interval(&self) -> SimTime {
        SimTime::from_millis(self.interval_ms)
    }

    pub fn until(&self) -> Option<SimTime> {
        self.until_ms.map(SimTime::from_millis)
    }
}
