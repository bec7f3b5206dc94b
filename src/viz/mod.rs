//! 传输过程的事件记录（用于离线回放）
//!
//! 设计目标：
//! - **结构化**：用 JSON 事件而不是解析文本日志
//! - **轻量**：在内存中收集，运行结束后一次性写出
//! - **可回放**：每个事件都带仿真时间戳

mod types;

pub use types::{VizEvent, VizEventKind, VizLogger, VizMeta, VizPacket, VizPacketKind};
