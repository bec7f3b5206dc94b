use crate::net::Packet;
use crate::proto::{Arrival, DeliveryTracker};

use super::msg;

fn data(seq: u64) -> Packet {
    Packet::data(seq, &msg(&format!("m{seq}")))
}

#[test]
fn in_order_packets_are_released_immediately() {
    let mut t = DeliveryTracker::new(3);
    assert_eq!(t.offer(data(0)), Arrival::Buffered);
    let out = t.release();
    assert_eq!(out.iter().map(|p| p.seq).collect::<Vec<_>>(), vec![0]);
    assert_eq!(t.expected(), 1);
    assert_eq!(t.last_delivered(), Some(0));
}

#[test]
fn gap_holds_later_packets_until_filled() {
    let mut t = DeliveryTracker::new(3);
    assert_eq!(t.offer(data(2)), Arrival::Buffered);
    assert_eq!(t.offer(data(1)), Arrival::Buffered);
    assert!(t.release().is_empty());
    assert_eq!(t.buffered(), 2);

    assert_eq!(t.offer(data(0)), Arrival::Buffered);
    let seqs: Vec<_> = t.release().iter().map(|p| p.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
    assert_eq!(t.expected(), 3);
    assert_eq!(t.buffered(), 0);
}

#[test]
fn classify_distinguishes_duplicate_stale_and_out_of_window() {
    let mut t = DeliveryTracker::new(3);
    t.offer(data(0));
    t.release();
    t.offer(data(2));

    assert_eq!(t.classify(2), Arrival::Duplicate);
    assert_eq!(t.classify(0), Arrival::Stale);
    assert_eq!(t.classify(3), Arrival::Buffered);
    assert_eq!(t.classify(4), Arrival::OutOfWindow);
    assert_eq!(t.offer(data(4)), Arrival::OutOfWindow);
}

#[test]
fn slots_are_reused_modulo_window() {
    let mut t = DeliveryTracker::new(2);
    for seq in 0..100u64 {
        assert_eq!(t.offer(data(seq)), Arrival::Buffered);
        assert_eq!(t.release().len(), 1);
    }
    assert_eq!(t.expected(), 100);
    // seq 98 and 99 are within one window behind
    assert_eq!(t.classify(98), Arrival::Stale);
    assert_eq!(t.classify(97), Arrival::OutOfWindow);
}

#[test]
fn clear_resets_expected_and_buffer() {
    let mut t = DeliveryTracker::new(4);
    t.offer(data(1));
    t.advance();
    t.clear();
    assert_eq!(t.expected(), 0);
    assert_eq!(t.buffered(), 0);
    assert_eq!(t.last_delivered(), None);
}
