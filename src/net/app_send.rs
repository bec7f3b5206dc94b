//! Application workload
//!
//! The application at A submits `messages` messages, one every `interval`.
//! Message `i` is 20 copies of the letter `'a' + i mod 26`.

use super::id::Entity;
use super::packet::{Message, PAYLOAD_LEN};
use super::proto_bridge::with_endpoints;
use crate::sim::{Event, RunSpec, SimTime, Simulator, World};
use tracing::debug;

/// Event: the application at A hands `msg` to the sender.
#[derive(Debug)]
pub struct AppSend {
    pub msg: Message,
}

impl Event for AppSend {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let AppSend { msg } = *self;
        with_endpoints(world, sim, |ctx, sender, _receiver| {
            let now = ctx.sim.now();
            debug!(msg = %msg, now = %now, "application send");
            ctx.net.stats.app_sent += 1;
            ctx.net.viz_app_send(now, Entity::A, &msg);
            sender.on_app_send(msg, ctx);
        });
    }
}

pub fn workload_message(i: u64) -> Message {
    let letter = b'a' + (i % 26) as u8;
    Message::from_array([letter; PAYLOAD_LEN])
}

/// Queue every application send of `spec`, starting at t=0.
pub fn schedule_workload(sim: &mut Simulator, spec: &RunSpec) {
    let interval = spec.interval();
    for i in 0..spec.messages {
        let at = SimTime(interval.0.saturating_mul(i));
        sim.schedule(
            at,
            AppSend {
                msg: workload_message(i),
            },
        );
    }
}
