use crate::net::{Entity, Message, NetApi, NetWorld, Packet, schedule_workload};
use crate::sim::{RunSpec, SimTime, Simulator};

mod channel;
mod delivery;
mod pending;
mod simulator;
mod timer;

/// Fake environment that records every request an engine makes.
#[derive(Debug, Default)]
pub(crate) struct RecordingApi {
    pub now: SimTime,
    pub sent: Vec<(Entity, Packet)>,
    pub delivered: Vec<(Entity, Message)>,
    pub running: [bool; 2],
    pub starts: usize,
    pub stops: usize,
}

impl RecordingApi {
    /// Drain packets transmitted so far.
    pub fn take_sent(&mut self) -> Vec<Packet> {
        self.sent.drain(..).map(|(_, p)| p).collect()
    }

    pub fn delivered_text(&self) -> Vec<String> {
        self.delivered.iter().map(|(_, m)| m.to_string()).collect()
    }

    pub fn timer_running(&self, entity: Entity) -> bool {
        self.running[entity.index()]
    }

    /// Simulate the harness firing the timer: it is no longer armed.
    pub fn fire(&mut self, entity: Entity) {
        self.running[entity.index()] = false;
    }
}

impl NetApi for RecordingApi {
    fn now(&self) -> SimTime {
        self.now
    }

    fn transmit(&mut self, from: Entity, pkt: Packet) {
        self.sent.push((from, pkt));
    }

    fn deliver(&mut self, at: Entity, msg: Message) {
        self.delivered.push((at, msg));
    }

    fn start_timer(&mut self, entity: Entity, _after: SimTime) {
        self.running[entity.index()] = true;
        self.starts += 1;
    }

    fn stop_timer(&mut self, entity: Entity) {
        self.running[entity.index()] = false;
        self.stops += 1;
    }
}

pub(crate) fn msg(s: &str) -> Message {
    Message::new(s.as_bytes()).expect("test message fits")
}

/// Build the world for `spec`, submit its workload and run to completion
/// (or `until_ms`).
pub(crate) fn run_spec(spec: &RunSpec) -> (Simulator, NetWorld) {
    let mut world = NetWorld::new(spec).expect("valid run spec");
    let mut sim = Simulator::default();
    world.init(&mut sim);
    schedule_workload(&mut sim, spec);
    match spec.until() {
        Some(until) => sim.run_until(until, &mut world),
        None => sim.run(&mut world),
    }
    (sim, world)
}
