//! Fixed-rate media time

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A count of media time units at [`Tick::RATE`] per second.
///
/// The rate is divisible by 1000 and by 8k, 16k, 44.1k and 48k, so
/// milliseconds and PCM sample counts convert without rounding. Tick
/// arithmetic is plain integer arithmetic and never drifts.
///
/// Ticks are signed: a timestamp shifted back by buffered content may sit
/// before the run origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tick(i64);

impl Tick {
    /// Ticks per second.
    pub const RATE: i64 = 705_600_000;

    /// The zero tick.
    pub const ZERO: Tick = Tick(0);

    const NANOS_PER_SECOND: i128 = 1_000_000_000;

    /// Create a tick count from a raw value.
    pub const fn new(ticks: i64) -> Self {
        Tick(ticks)
    }

    /// Raw tick count.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Exact conversion from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Tick(millis as i64 * (Self::RATE / 1000))
    }

    /// Exact conversion from a sample count at `sample_rate` Hz.
    ///
    /// Exact whenever `sample_rate` divides [`Tick::RATE`].
    pub const fn from_samples(samples: u64, sample_rate: u32) -> Self {
        Tick((samples as i128 * Self::RATE as i128 / sample_rate as i128) as i64)
    }

    /// Number of whole samples at `sample_rate` Hz covered by this span.
    ///
    /// Negative spans cover no samples.
    pub const fn to_samples(self, sample_rate: u32) -> u64 {
        if self.0 <= 0 {
            return 0;
        }
        (self.0 as i128 * sample_rate as i128 / Self::RATE as i128) as u64
    }

    /// Conversion from wall-clock time, truncated to whole ticks.
    pub fn from_duration(duration: Duration) -> Self {
        let ticks = duration.as_nanos() as i128 * Self::RATE as i128 / Self::NANOS_PER_SECOND;
        Tick(ticks.min(i64::MAX as i128) as i64)
    }

    /// Conversion to wall-clock time. Negative spans clamp to zero.
    pub fn to_duration(self) -> Duration {
        if self.0 <= 0 {
            return Duration::ZERO;
        }
        let nanos = self.0 as i128 * Self::NANOS_PER_SECOND / Self::RATE as i128;
        Duration::from_nanos(nanos as u64)
    }

    /// Whether this span is zero or negative.
    pub const fn is_zero_or_negative(self) -> bool {
        self.0 <= 0
    }
}

impl Add for Tick {
    type Output = Tick;

    fn add(self, rhs: Tick) -> Tick {
        Tick(self.0 + rhs.0)
    }
}

impl AddAssign for Tick {
    fn add_assign(&mut self, rhs: Tick) {
        self.0 += rhs.0;
    }
}

impl Sub for Tick {
    type Output = Tick;

    fn sub(self, rhs: Tick) -> Tick {
        Tick(self.0 - rhs.0)
    }
}

impl SubAssign for Tick {
    fn sub_assign(&mut self, rhs: Tick) {
        self.0 -= rhs.0;
    }
}

impl Neg for Tick {
    type Output = Tick;

    fn neg(self) -> Tick {
        Tick(-self.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{:?}", (-*self).to_duration())
        } else {
            write!(f, "{:?}", self.to_duration())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn millis_and_samples_agree() {
        assert_eq!(Tick::from_millis(20), Tick::from_samples(160, 8_000));
        assert_eq!(Tick::from_millis(20), Tick::from_samples(960, 48_000));
        assert_eq!(Tick::from_millis(10), Tick::from_samples(441, 44_100));
        assert_eq!(Tick::from_millis(20).to_samples(16_000), 320);
    }

    #[test]
    fn duration_conversion_is_exact_for_millis() {
        let tick = Tick::from_duration(Duration::from_millis(250));
        assert_eq!(tick, Tick::from_millis(250));
        assert_eq!(tick.to_duration(), Duration::from_millis(250));
    }

    #[test]
    fn negative_spans_clamp() {
        let tick = -Tick::from_millis(5);
        assert!(tick.is_zero_or_negative());
        assert_eq!(tick.to_duration(), Duration::ZERO);
        assert_eq!(tick.to_samples(8_000), 0);
    }

    proptest! {
        #[test]
        fn repeated_addition_does_not_drift(ms in 1u64..1000, count in 1i64..10_000) {
            let mut acc = Tick::ZERO;
            for _ in 0..count {
                acc += Tick::from_millis(ms);
            }
            prop_assert_eq!(acc, Tick::from_millis(ms * count as u64));
            prop_assert_eq!(acc.to_duration(), Duration::from_millis(ms * count as u64));
        }
    }
}
