use serde::{Deserialize, Serialize};

use crate::net::{Entity, Packet};

/// 事件类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VizEventKind {
    /// 运行参数；最先记录，t=0
    Meta(VizMeta),
    /// A 端应用提交了一条消息
    AppSend { entity: Entity, text: String },
    /// 端点把分组交给信道
    Transmit(VizPacket),
    /// 信道丢弃了分组
    Lost(VizPacket),
    /// 信道损坏了分组（仍会到达）
    Corrupted(VizPacket),
    /// 分组到达目的端点
    Arrive(VizPacket),
    /// B 把载荷交付给应用层
    Deliver { entity: Entity, text: String },
    TimerStart { entity: Entity, after_ns: u64 },
    TimerStop { entity: Entity },
    TimerFire { entity: Entity },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizMeta {
    pub protocol: String,
    pub window_size: usize,
    pub loss_prob: f64,
    pub corrupt_prob: f64,
    pub timeout_ns: u64,
    pub messages: u64,
}

/// 从发送方看：数据或 ACK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VizPacketKind {
    Data,
    Ack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizPacket {
    pub from: Entity,
    pub pkt_kind: VizPacketKind,
    pub seq: u64,
    pub ack: u64,
}

impl VizPacket {
    pub fn new(from: Entity, pkt: &Packet) -> Self {
        // 单向传输中只有 A 发送数据
        let pkt_kind = match from {
            Entity::A => VizPacketKind::Data,
            Entity::B => VizPacketKind::Ack,
        };
        Self {
            from,
            pkt_kind,
            seq: pkt.seq,
            ack: pkt.ack,
        }
    }
}

/// 一条可回放事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizEvent {
    /// 仿真时间（纳秒，与 `SimTime.0` 同单位）
    pub t_ns: u64,
    #[serde(flatten)]
    pub kind: VizEventKind,
}

/// 内存中的事件收集器；运行结束后由二进制写出为 JSON。
#[derive(Debug, Default)]
pub struct VizLogger {
    pub events: Vec<VizEvent>,
}

impl VizLogger {
    pub fn push(&mut self, ev: VizEvent) {
        self.events.push(ev);
    }

    pub fn count(&self, pred: impl Fn(&VizEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }
}
