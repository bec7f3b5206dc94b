//! 分组到达事件
//!
//! 信道时延结束后触发，把分组交给目的端点。

use super::id::Entity;
use super::packet::Packet;
use super::proto_bridge::with_endpoints;
use crate::sim::{Event, Simulator, World};
use tracing::debug;

/// 事件：`from` 发出的 `pkt` 到达 `to`。
#[derive(Debug)]
pub struct DeliverPacket {
    pub from: Entity,
    pub to: Entity,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    #[tracing::instrument(skip(self, sim, world), fields(from = %self.from, to = %self.to, seq = self.pkt.seq, ack = self.pkt.ack))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DeliverPacket { from, to, pkt } = *self;
        debug!(now = %sim.now(), "分组到达");

        with_endpoints(world, sim, |ctx, sender, receiver| {
            ctx.net.on_arrival(from, &pkt, ctx.sim.now());
            match to {
                Entity::A => sender.on_packet(pkt, ctx),
                Entity::B => receiver.on_packet(pkt, ctx),
            }
        });
    }
}
