//! 重传定时器事件

use super::id::Entity;
use super::proto_bridge::with_endpoints;
use crate::sim::{Event, Simulator, World};
use tracing::trace;

/// 事件：`entity` 第 `generation` 次启动的定时器到期。
#[derive(Debug)]
pub struct TimerFired {
    pub entity: Entity,
    pub generation: u64,
}

impl Event for TimerFired {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TimerFired { entity, generation } = *self;
        with_endpoints(world, sim, |ctx, sender, _receiver| {
            if !ctx.net.fire_timer(entity, generation, ctx.sim.now()) {
                return;
            }
            match entity {
                Entity::A => sender.on_timer(ctx),
                // 接收端从不启动定时器
                Entity::B => trace!("B 端定时器到期，忽略"),
            }
        });
    }
}
