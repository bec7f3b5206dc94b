//! Trace hooks for the network.

use crate::sim::SimTime;
use crate::viz::{VizEvent, VizEventKind, VizMeta, VizPacket};

use super::{Entity, Message, Network, Packet};

impl Network {
    fn viz_push(&mut self, t: SimTime, kind: VizEventKind) {
        if let Some(v) = &mut self.viz {
            v.push(VizEvent { t_ns: t.0, kind });
        }
    }

    pub fn emit_viz_meta(&mut self, meta: VizMeta) {
        self.viz_push(SimTime::ZERO, VizEventKind::Meta(meta));
    }

    pub(crate) fn viz_app_send(&mut self, t: SimTime, entity: Entity, msg: &Message) {
        if self.viz.is_none() {
            return;
        }
        let text = msg.to_string();
        self.viz_push(t, VizEventKind::AppSend { entity, text });
    }

    pub(crate) fn viz_transmit(&mut self, t: SimTime, from: Entity, pkt: &Packet) {
        self.viz_push(t, VizEventKind::Transmit(VizPacket::new(from, pkt)));
    }

    pub(crate) fn viz_lost(&mut self, t: SimTime, from: Entity, pkt: &Packet) {
        self.viz_push(t, VizEventKind::Lost(VizPacket::new(from, pkt)));
    }

    pub(crate) fn viz_corrupted(&mut self, t: SimTime, from: Entity, pkt: &Packet) {
        self.viz_push(t, VizEventKind::Corrupted(VizPacket::new(from, pkt)));
    }

    pub(crate) fn viz_arrive(&mut self, t: SimTime, from: Entity, pkt: &Packet) {
        self.viz_push(t, VizEventKind::Arrive(VizPacket::new(from, pkt)));
    }

    pub(crate) fn viz_deliver(&mut self, t: SimTime, entity: Entity, msg: &Message) {
        if self.viz.is_none() {
            return;
        }
        let text = msg.to_string();
        self.viz_push(t, VizEventKind::Deliver { entity, text });
    }

    pub(crate) fn viz_timer_start(&mut self, t: SimTime, entity: Entity, after: SimTime) {
        self.viz_push(t, VizEventKind::TimerStart { entity, after_ns: after.0 });
    }

    pub(crate) fn viz_timer_stop(&mut self, t: SimTime, entity: Entity) {
        self.viz_push(t, VizEventKind::TimerStop { entity });
    }

    pub(crate) fn viz_timer_fire(&mut self, t: SimTime, entity: Entity) {
        self.viz_push(t, VizEventKind::TimerFire { entity });
    }
}
