//! 仿真网络
//!
//! 持有信道、每个端点一个逻辑定时器、应用层交付记录和统计信息。
//! 协议引擎通过 [`super::NetApi`] 访问。

use super::channel::{Channel, ChannelConfig, Fate};
use super::deliver_packet::DeliverPacket;
use super::id::Entity;
use super::packet::{Message, Packet};
use super::stats::Stats;
use super::timer_fired::TimerFired;
use crate::sim::{SimTime, Simulator};
use crate::viz::VizLogger;
use tracing::{debug, info, trace};

#[derive(Debug, Default, Clone, Copy)]
struct TimerSlot {
    armed: bool,
    /// 每次启动递增；stop/start 之前调度的超时事件因此失效。
    generation: u64,
}

#[derive(Debug)]
pub struct Network {
    channel: Channel,
    timers: [TimerSlot; 2],
    delivered: Vec<Message>,
    pub stats: Stats,
    pub viz: Option<VizLogger>,
}

impl Network {
    pub fn new(cfg: ChannelConfig) -> Self {
        Self {
            channel: Channel::new(cfg),
            timers: [TimerSlot::default(); 2],
            delivered: Vec::new(),
            stats: Stats::default(),
            viz: None,
        }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// 按交付顺序记录 B 端应用收到的载荷
    pub fn delivered(&self) -> &[Message] {
        &self.delivered
    }

    pub fn timer_running(&self, entity: Entity) -> bool {
        self.timers[entity.index()].armed
    }

    /// 把 `from` 发出的分组交给信道
    #[tracing::instrument(skip(self, pkt, sim), fields(seq = pkt.seq, ack = pkt.ack))]
    pub fn transmit(&mut self, from: Entity, mut pkt: Packet, sim: &mut Simulator) {
        let now = sim.now();
        self.stats.dir_mut(from).transmitted += 1;
        self.viz_transmit(now, from, &pkt);

        match self.channel.send(from, &mut pkt, now) {
            Fate::Lost => {
                debug!("信道丢包");
                self.stats.dir_mut(from).lost += 1;
                self.viz_lost(now, from, &pkt);
            }
            Fate::Arrives { at, corrupted } => {
                if corrupted {
                    debug!("信道损坏分组");
                    self.stats.dir_mut(from).corrupted += 1;
                    self.viz_corrupted(now, from, &pkt);
                }
                trace!(arrive = ?at, "调度到达事件");
                sim.schedule(
                    at,
                    DeliverPacket {
                        from,
                        to: from.peer(),
                        pkt,
                    },
                );
            }
        }
    }

    pub(crate) fn on_arrival(&mut self, from: Entity, pkt: &Packet, now: SimTime) {
        self.stats.dir_mut(from).arrived += 1;
        self.viz_arrive(now, from, pkt);
    }

    pub(crate) fn deliver_to_app(&mut self, at: Entity, msg: Message, now: SimTime) {
        info!(entity = %at, msg = %msg, t = %now, "交付给应用层");
        self.stats.delivered_msgs += 1;
        self.viz_deliver(now, at, &msg);
        self.delivered.push(msg);
    }

    pub(crate) fn start_timer(&mut self, entity: Entity, after: SimTime, sim: &mut Simulator) {
        let slot = &mut self.timers[entity.index()];
        if slot.armed {
            debug!(entity = %entity, "定时器已在运行，忽略启动");
            return;
        }
        slot.armed = true;
        slot.generation += 1;
        let generation = slot.generation;
        self.stats.timer_starts += 1;
        self.viz_timer_start(sim.now(), entity, after);
        sim.schedule_after(after, TimerFired { entity, generation });
    }

    pub(crate) fn stop_timer(&mut self, entity: Entity, now: SimTime) {
        let slot = &mut self.timers[entity.index()];
        if !slot.armed {
            trace!(entity = %entity, "定时器未运行，忽略停止");
            return;
        }
        slot.armed = false;
        self.viz_timer_stop(now, entity);
    }

    /// 消费一次超时事件。已取消或被后续启动取代的超时返回 `false`。
    pub(crate) fn fire_timer(&mut self, entity: Entity, generation: u64, now: SimTime) -> bool {
        let slot = &mut self.timers[entity.index()];
        if !slot.armed || slot.generation != generation {
            trace!(entity = %entity, generation, "过期的定时器事件");
            return false;
        }
        slot.armed = false;
        self.stats.timer_fires += 1;
        self.viz_timer_fire(now, entity);
        true
    }
}
