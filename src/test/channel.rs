use crate::net::{Channel, ChannelConfig, Entity, Fate, Packet};
use crate::sim::SimTime;

use super::msg;

fn channel(loss_prob: f64, corrupt_prob: f64, seed: u64) -> Channel {
    Channel::new(ChannelConfig {
        loss_prob,
        corrupt_prob,
        min_delay: SimTime::from_millis(1),
        max_delay: SimTime::from_millis(10),
        seed,
    })
}

#[test]
fn clean_channel_delays_within_bounds_and_keeps_order() {
    let mut ch = channel(0.0, 0.0, 7);
    let mut last = SimTime::ZERO;
    for i in 0..500u64 {
        let now = SimTime::from_micros(i * 100);
        let mut pkt = Packet::data(i, &msg("x"));
        match ch.send(Entity::A, &mut pkt, now) {
            Fate::Lost => panic!("clean channel lost packet {i}"),
            Fate::Arrives { at, corrupted } => {
                assert!(!corrupted);
                assert!(pkt.is_valid());
                assert!(at >= now.after(SimTime::from_millis(1)));
                assert!(at <= now.after(SimTime::from_millis(10)));
                assert!(at >= last, "packet {i} overtook an earlier one");
                last = at;
            }
        }
    }
}

#[test]
fn directions_are_ordered_independently() {
    let mut ch = channel(0.0, 0.0, 3);
    let mut late = Packet::data(0, &msg("x"));
    let Fate::Arrives { at: a_at, .. } = ch.send(Entity::A, &mut late, SimTime::from_millis(100)) else {
        panic!("lost");
    };
    let mut early = Packet::ack(0);
    let Fate::Arrives { at: b_at, .. } = ch.send(Entity::B, &mut early, SimTime::ZERO) else {
        panic!("lost");
    };
    assert!(b_at < a_at);
}

#[test]
fn certain_loss_drops_everything() {
    let mut ch = channel(1.0, 0.0, 1);
    for i in 0..100 {
        let mut pkt = Packet::data(i, &msg("x"));
        assert_eq!(ch.send(Entity::A, &mut pkt, SimTime::ZERO), Fate::Lost);
    }
}

#[test]
fn certain_corruption_is_always_detected() {
    let mut ch = channel(0.0, 1.0, 11);
    for i in 0..1_000 {
        let mut pkt = if i % 2 == 0 {
            Packet::data(i, &msg("payload"))
        } else {
            Packet::ack(i)
        };
        let Fate::Arrives { corrupted, .. } = ch.send(Entity::A, &mut pkt, SimTime::ZERO) else {
            panic!("lost");
        };
        assert!(corrupted);
        assert!(!pkt.is_valid(), "single-bit corruption went unnoticed: {pkt:?}");
    }
}

#[test]
fn loss_rate_tracks_probability() {
    let mut ch = channel(0.3, 0.0, 99);
    let n = 10_000;
    let lost = (0..n)
        .filter(|&i| {
            let mut pkt = Packet::data(i, &msg("x"));
            ch.send(Entity::A, &mut pkt, SimTime::ZERO) == Fate::Lost
        })
        .count();
    let rate = lost as f64 / n as f64;
    assert!((0.27..0.33).contains(&rate), "loss rate {rate}");
}

#[test]
fn same_seed_same_fates() {
    let fates = |seed| {
        let mut ch = channel(0.2, 0.2, seed);
        (0..200u64)
            .map(|i| {
                let mut pkt = Packet::data(i, &msg("x"));
                (ch.send(Entity::A, &mut pkt, SimTime::from_millis(i)), pkt)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(fates(42), fates(42));
    assert_ne!(fates(42), fates(43));
}
