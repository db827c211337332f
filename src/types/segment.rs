//! Fixed-duration content wrappers

use std::ops::Deref;

use super::{Content, FixedDuration, Tick};

/// Content of exactly `MS` milliseconds, produced by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<C, const MS: u64> {
    inner: C,
}

impl<C, const MS: u64> Segment<C, MS> {
    pub(crate) fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Strip the wrapper once segmentation metadata is no longer needed.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C, const MS: u64> Deref for Segment<C, MS> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: Content, const MS: u64> Content for Segment<C, MS> {
    fn duration(&self) -> Tick {
        self.inner.duration()
    }

    fn materialize(&self) -> Self {
        Self::new(self.inner.materialize())
    }
}

impl<C, const MS: u64> FixedDuration for Segment<C, MS> {
    const DURATION: Tick = Tick::from_millis(MS);
}

/// Either real content or a synthesized gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discontinuous<C> {
    /// Data that actually arrived
    Got(C),

    /// Nothing arrived within the expected interval
    Missing,
}

impl<C> Discontinuous<C> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Discontinuous::Missing)
    }

    pub fn into_option(self) -> Option<C> {
        match self {
            Discontinuous::Got(content) => Some(content),
            Discontinuous::Missing => None,
        }
    }

    pub fn as_ref(&self) -> Discontinuous<&C> {
        match self {
            Discontinuous::Got(content) => Discontinuous::Got(content),
            Discontinuous::Missing => Discontinuous::Missing,
        }
    }

    /// Fill a gap with `fill`, e.g. silence.
    pub fn unwrap_or_else(self, fill: impl FnOnce() -> C) -> C {
        match self {
            Discontinuous::Got(content) => content,
            Discontinuous::Missing => fill(),
        }
    }
}

impl<C> From<Option<C>> for Discontinuous<C> {
    fn from(value: Option<C>) -> Self {
        match value {
            Some(content) => Discontinuous::Got(content),
            None => Discontinuous::Missing,
        }
    }
}
