//! Integrity validator
//!
//! Additive checksum: `seq + ack + sum(payload bytes)`, wrapping in `u64`.
//! Any single-field change made by the channel's corruption model (one flipped
//! bit in one field) moves the sum by a non-zero power of two and is therefore
//! caught. Multi-field corruption can cancel out; this is a parity-style check,
//! not a collision-resistant one. Data and ACK packets use the same formula.

use super::packet::Packet;

/// Checksum over everything except the checksum field itself.
pub fn checksum(pkt: &Packet) -> u64 {
    pkt.payload
        .iter()
        .fold(pkt.seq.wrapping_add(pkt.ack), |sum, &b| {
            sum.wrapping_add(u64::from(b))
        })
}

pub fn is_valid(pkt: &Packet) -> bool {
    checksum(pkt) == pkt.checksum
}
