use crate::net::{Entity, Packet};
use crate::proto::{Expiry, ProtoConfig, RetransmitScope, RetransmitTimer, SendWindow};
use crate::sim::SimTime;

use super::{RecordingApi, msg};

fn timer(max_retransmits: Option<u32>) -> RetransmitTimer {
    let cfg = ProtoConfig {
        max_retransmits,
        ..ProtoConfig::default()
    };
    RetransmitTimer::new(Entity::A, &cfg)
}

#[test]
fn start_and_stop_are_idempotent() {
    let mut api = RecordingApi::default();
    let mut t = timer(None);

    t.stop(&mut api);
    assert_eq!(api.stops, 0, "stopping an idle timer is a no-op");

    t.start(&mut api);
    t.start(&mut api);
    assert_eq!(api.starts, 1);
    assert!(t.is_running());
    assert!(api.timer_running(Entity::A));

    t.stop(&mut api);
    t.stop(&mut api);
    assert_eq!(api.stops, 1);
    assert!(!api.timer_running(Entity::A));
}

#[test]
fn restart_rearms_a_running_timer() {
    let mut api = RecordingApi::default();
    let mut t = timer(None);
    t.start(&mut api);
    t.restart(&mut api);
    assert_eq!((api.starts, api.stops), (2, 1));
    assert!(t.is_running());
}

#[test]
fn progress_stops_or_rearms_and_resets_expiries() {
    let mut api = RecordingApi::default();
    let mut t = timer(None);
    t.start(&mut api);
    t.on_expiry();
    t.start(&mut api);
    assert_eq!(t.expiries(), 1);

    t.on_progress(true, &mut api);
    assert!(t.is_running());
    assert_eq!(t.expiries(), 0);

    t.on_progress(false, &mut api);
    assert!(!t.is_running());
    assert!(!api.timer_running(Entity::A));
}

#[test]
fn retry_ceiling_gives_up_after_max_rounds() {
    let mut t = timer(Some(2));
    assert_eq!(t.on_expiry(), Expiry::Retransmit);
    assert_eq!(t.on_expiry(), Expiry::Retransmit);
    assert_eq!(t.on_expiry(), Expiry::GiveUp);

    let mut unbounded = timer(None);
    for _ in 0..1_000 {
        assert_eq!(unbounded.on_expiry(), Expiry::Retransmit);
    }
}

#[test]
fn scope_selects_per_variant() {
    let mut w = SendWindow::new(4);
    for seq in 0..4 {
        w.push(Packet::data(seq, &msg("x")), SimTime::ZERO);
    }
    w.mark_acked(0);
    w.mark_acked(2);

    assert_eq!(RetransmitScope::Window.select(&w), vec![1, 3]);
    assert_eq!(RetransmitScope::Oldest.select(&w), vec![1]);
    assert_eq!(RetransmitScope::LastSent.select(&w), vec![3]);

    let empty = SendWindow::new(4);
    assert!(RetransmitScope::Window.select(&empty).is_empty());
    assert!(RetransmitScope::Oldest.select(&empty).is_empty());
}
