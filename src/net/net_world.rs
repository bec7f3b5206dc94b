//! 网络世界
//!
//! 一次传输的 [`World`]：网络本身、A 端发送引擎与 B 端接收引擎。

use super::api::NetCtx;
use super::network::Network;
use crate::error::ConfigError;
use crate::proto::{self, ReceiverEngine, SenderEngine};
use crate::sim::{RunSpec, Simulator, World};
use crate::viz::VizMeta;
use std::any::Any;
use tracing::warn;

pub struct NetWorld {
    pub net: Network,
    pub sender: Box<dyn SenderEngine>,
    pub receiver: Box<dyn ReceiverEngine>,
}

impl NetWorld {
    pub fn new(spec: &RunSpec) -> Result<Self, ConfigError> {
        spec.validate()?;
        let (sender, receiver) = proto::build(spec.protocol, &spec.proto_config())?;
        Ok(Self::with_engines(Network::new(spec.channel_config()), sender, receiver))
    }

    pub fn with_engines(
        net: Network,
        sender: Box<dyn SenderEngine>,
        receiver: Box<dyn ReceiverEngine>,
    ) -> Self {
        Self {
            net,
            sender,
            receiver,
        }
    }

    /// 重置两端协议状态；发送端经由网络停掉自己的重传定时器。
    pub fn init(&mut self, sim: &mut Simulator) {
        let mut ctx = NetCtx { net: &mut self.net, sim };
        self.sender.init(&mut ctx);
        self.receiver.init();
    }

    /// 把运行参数记为第一条 trace 事件；未启用 logger 时不做任何事。
    pub fn emit_meta(&mut self, spec: &RunSpec) {
        let window_size = self.sender.window().size;
        self.net.emit_viz_meta(VizMeta {
            protocol: spec.protocol.to_string(),
            window_size,
            loss_prob: spec.loss_prob,
            corrupt_prob: spec.corrupt_prob,
            timeout_ns: spec.proto_config().timeout.0,
            messages: spec.messages,
        });
    }
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, sim: &mut Simulator) {
        let w = self.sender.window();
        if !w.holds() {
            warn!(base = w.base, next_seq = w.next_seq, size = w.size, now = %sim.now(), "发送窗口不变量被破坏");
            self.net.stats.window_violations += 1;
        }
    }
}
