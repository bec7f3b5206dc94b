//! 数据包与应用消息
//!
//! [`Message`] 是应用交给发送端的数据；[`Packet`] 是在信道上传输的分组。
//! 数据分组携带消息，ACK 分组载荷全零、只使用 `ack` 字段。

use std::fmt;

use super::checksum::checksum;
use crate::error::PacketError;

/// 消息与分组的固定载荷长度
pub const PAYLOAD_LEN: usize = 20;

/// 序列号。单调递增，本仿真中不回绕。
pub type SeqNum = u64;

/// 应用载荷，不足 [`PAYLOAD_LEN`] 时补零。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Message {
    data: [u8; PAYLOAD_LEN],
}

impl Message {
    pub fn new(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() > PAYLOAD_LEN {
            return Err(PacketError::MessageTooLong {
                len: bytes.len(),
                max: PAYLOAD_LEN,
            });
        }
        let mut data = [0u8; PAYLOAD_LEN];
        data[..bytes.len()].copy_from_slice(bytes);
        Ok(Self { data })
    }

    pub fn from_array(data: [u8; PAYLOAD_LEN]) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.data
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self
            .data
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |i| i + 1);
        f.write_str(&String::from_utf8_lossy(&self.data[..end]))
    }
}

/// 信道上传输的分组。
///
/// 字段公开以便信道注入损坏；引擎把构造好的分组视为不可变，并保留副本用于重传。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub seq: SeqNum,
    pub ack: SeqNum,
    pub checksum: u64,
    pub payload: [u8; PAYLOAD_LEN],
}

impl Packet {
    /// 构造序列号为 `seq` 的数据分组
    pub fn data(seq: SeqNum, msg: &Message) -> Self {
        Self::sealed(seq, 0, *msg.as_bytes())
    }

    /// 构造确认 `ack` 的 ACK 分组
    pub fn ack(ack: SeqNum) -> Self {
        Self::sealed(0, ack, [0u8; PAYLOAD_LEN])
    }

    fn sealed(seq: SeqNum, ack: SeqNum, payload: [u8; PAYLOAD_LEN]) -> Self {
        let mut pkt = Self {
            seq,
            ack,
            checksum: 0,
            payload,
        };
        pkt.checksum = checksum(&pkt);
        pkt
    }

    pub fn is_valid(&self) -> bool {
        super::checksum::is_valid(self)
    }

    pub fn message(&self) -> Message {
        Message::from_array(self.payload)
    }
}
