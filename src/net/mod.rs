//! 网络模块
//!
//! 协议引擎的运行环境：分组格式与校验和、有损但保序的信道、每端点定时器，以及驱动传输的事件。

mod api;
mod app_send;
mod channel;
mod checksum;
mod deliver_packet;
mod id;
mod net_world;
mod network;
mod network_viz;
mod packet;
mod proto_bridge;
mod stats;
mod timer_fired;

pub use api::{NetApi, NetCtx};
pub use app_send::{AppSend, schedule_workload, workload_message};
pub use channel::{Channel, ChannelConfig, Fate};
pub use checksum::{checksum, is_valid};
pub use deliver_packet::DeliverPacket;
pub use id::Entity;
pub use net_world::NetWorld;
pub use network::Network;
pub use packet::{Message, PAYLOAD_LEN, Packet, SeqNum};
pub use stats::{DirStats, Stats};
pub use timer_fired::TimerFired;
