//! Per-run frame numbering

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-run frame counter, wrapping modulo 2^32.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceNumber(u32);

impl SequenceNumber {
    /// First sequence number of a run.
    pub const ZERO: SequenceNumber = SequenceNumber(0);

    pub const fn new(value: u32) -> Self {
        SequenceNumber(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// The following sequence number.
    pub const fn next(self) -> Self {
        SequenceNumber(self.0.wrapping_add(1))
    }

    /// Shift by a signed offset, modulo the counter width.
    pub const fn offset(self, delta: i64) -> Self {
        SequenceNumber(self.0.wrapping_add(delta as u32))
    }

    /// Signed distance from `earlier` to `self`, assuming they are less than
    /// half the counter range apart.
    pub const fn distance_from(self, earlier: SequenceNumber) -> i32 {
        self.0.wrapping_sub(earlier.0) as i32
    }

    /// Advance in place, returning the value before the increment.
    pub fn post_increment(&mut self) -> Self {
        let current = *self;
        *self = self.next();
        current
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_width() {
        let last = SequenceNumber::new(u32::MAX);
        assert_eq!(last.next(), SequenceNumber::ZERO);
        assert_eq!(SequenceNumber::ZERO.distance_from(last), 1);
    }

    #[test]
    fn signed_offsets() {
        let seq = SequenceNumber::new(10);
        assert_eq!(seq.offset(-3), SequenceNumber::new(7));
        assert_eq!(seq.offset(5), SequenceNumber::new(15));
        assert_eq!(SequenceNumber::ZERO.offset(-1), SequenceNumber::new(u32::MAX));
    }

    #[test]
    fn post_increment_returns_previous() {
        let mut seq = SequenceNumber::ZERO;
        assert_eq!(seq.post_increment(), SequenceNumber::ZERO);
        assert_eq!(seq.post_increment(), SequenceNumber::new(1));
        assert_eq!(seq, SequenceNumber::new(2));
    }
}
