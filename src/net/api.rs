//! Collaborator API used by protocol engines.
//!
//! The engines never touch the simulator or the channel directly; they issue
//! requests through [`NetApi`], which makes them testable against a fake.

use crate::sim::{SimTime, Simulator};

use super::{Entity, Message, Network, Packet};

/// Requests a protocol engine can make of its environment.
pub trait NetApi {
    /// Current simulated time. Bookkeeping only, never used for protocol
    /// decisions.
    fn now(&self) -> SimTime;
    /// Hand a packet to the channel. No delivery guarantee.
    fn transmit(&mut self, from: Entity, pkt: Packet);
    /// Pass a validated, in-order payload up to the application at `at`.
    fn deliver(&mut self, at: Entity, msg: Message);
    /// Arm the timer of `entity`. Ignored if it is already running.
    fn start_timer(&mut self, entity: Entity, after: SimTime);
    /// Disarm the timer of `entity`. Ignored if it is not running.
    fn stop_timer(&mut self, entity: Entity);
}

/// The simulated environment as seen from inside one event.
pub struct NetCtx<'a> {
    pub net: &'a mut Network,
    pub sim: &'a mut Simulator,
}

impl NetApi for NetCtx<'_> {
    fn now(&self) -> SimTime {
        self.sim.now()
    }

    fn transmit(&mut self, from: Entity, pkt: Packet) {
        self.net.transmit(from, pkt, self.sim)
    }

    fn deliver(&mut self, at: Entity, msg: Message) {
        self.net.deliver_to_app(at, msg, self.sim.now())
    }

    fn start_timer(&mut self, entity: Entity, after: SimTime) {
        self.net.start_timer(entity, after, self.sim)
    }

    fn stop_timer(&mut self, entity: Entity) {
        self.net.stop_timer(entity, self.sim.now())
    }
}
