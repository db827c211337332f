//! Content capabilities used by the segmenter and the frame ring

use super::Tick;

/// Frame payload with a measurable duration.
///
/// The core never interprets payload bytes; it only needs to know how much
/// media time a value covers and how to detach it from producer-owned memory.
pub trait Content: Send + 'static {
    /// Media time covered by this value.
    fn duration(&self) -> Tick;

    /// Deep copy into an independently owned buffer.
    ///
    /// The result must not share storage with `self`, so the producer may
    /// reuse or mutate its working buffer after handing the copy off.
    fn materialize(&self) -> Self
    where
        Self: Sized;
}

/// Content that can be cut and joined along the time axis.
pub trait Splittable: Content + Sized {
    /// Whether no content remains.
    fn is_empty(&self) -> bool;

    /// `self` followed by `other`.
    fn concat(self, other: Self) -> Self;

    /// Whether a prefix of exactly `at` can be cut from values of this type.
    ///
    /// Only positive spans qualify.
    fn is_split_point(at: Tick) -> bool {
        !at.is_zero_or_negative()
    }

    /// Split into a prefix covering exactly `at` and the remaining suffix.
    ///
    /// Returns `Err(self)` unchanged when less than `at` is available or when
    /// `at` is not a split point for this type.
    fn split_at(self, at: Tick) -> Result<(Self, Self), Self>;
}

/// Content types whose values all share one statically known duration.
pub trait FixedDuration {
    const DURATION: Tick;
}
