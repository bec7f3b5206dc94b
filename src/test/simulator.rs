use crate::sim::{Event, SimTime, Simulator, World};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CountingWorld {
    ticks: usize,
}

impl World for CountingWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.ticks += 1;
    }
}

struct Record {
    id: u32,
    log: Arc<Mutex<Vec<(u32, SimTime)>>>,
}

impl Event for Record {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        self.log.lock().expect("log lock").push((self.id, sim.now()));
    }
}

/// Records itself, then schedules `next` after `delay`.
struct Chain {
    id: u32,
    next: u32,
    delay: SimTime,
    log: Arc<Mutex<Vec<(u32, SimTime)>>>,
}

impl Event for Chain {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let Chain { id, next, delay, log } = *self;
        log.lock().expect("log lock").push((id, sim.now()));
        sim.schedule_after(delay, Record { id: next, log });
    }
}

fn ids(log: &Arc<Mutex<Vec<(u32, SimTime)>>>) -> Vec<u32> {
    log.lock().expect("log lock").iter().map(|(id, _)| *id).collect()
}

#[test]
fn events_run_by_time_then_insertion_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    for (id, at) in [(1, 10), (2, 5), (3, 10), (4, 0)] {
        sim.schedule(SimTime(at), Record { id, log: Arc::clone(&log) });
    }

    let mut world = CountingWorld::default();
    sim.run(&mut world);

    assert_eq!(ids(&log), vec![4, 2, 1, 3]);
    assert_eq!(world.ticks, 4);
    assert_eq!(sim.executed(), 4);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn schedule_after_is_relative_to_the_running_event() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(100),
        Chain {
            id: 1,
            next: 2,
            delay: SimTime(50),
            log: Arc::clone(&log),
        },
    );

    let mut world = CountingWorld::default();
    sim.run(&mut world);

    assert_eq!(
        &*log.lock().expect("log lock"),
        &[(1, SimTime(100)), (2, SimTime(150))]
    );
}

#[test]
fn same_time_event_scheduled_from_an_event_runs_after_it() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        Chain {
            id: 1,
            next: 2,
            delay: SimTime::ZERO,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(SimTime::ZERO, Record { id: 3, log: Arc::clone(&log) });

    let mut world = CountingWorld::default();
    sim.run(&mut world);

    assert_eq!(ids(&log), vec![1, 3, 2]);
}

#[test]
fn run_until_stops_before_later_events_and_advances_time() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    sim.schedule(SimTime(5), Record { id: 1, log: Arc::clone(&log) });
    sim.schedule(SimTime(10), Record { id: 2, log: Arc::clone(&log) });

    let mut world = CountingWorld::default();
    sim.run_until(SimTime(5), &mut world);
    assert_eq!(ids(&log), vec![1]);
    assert_eq!(sim.pending(), 1);
    assert_eq!(sim.now(), SimTime(5));

    sim.run_until(SimTime(7), &mut world);
    assert_eq!(sim.now(), SimTime(7));

    sim.run(&mut world);
    assert_eq!(ids(&log), vec![1, 2]);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn events_in_the_past_are_clamped_to_now() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    let mut world = CountingWorld::default();
    sim.run_until(SimTime(20), &mut world);

    sim.schedule(SimTime(3), Record { id: 1, log: Arc::clone(&log) });
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[(1, SimTime(20))]);
}
