//! Stream adaptors over event streams

mod map_content;
mod segmenter;

pub use map_content::MapContent;
pub use segmenter::{EventTransform, Segmented, Segmenter};

use futures::Stream;

use crate::Result;
use crate::types::{Segment, Splittable, StreamEvent};

/// Extension trait for streams of `Result<StreamEvent<C>>`
pub trait EventStreamExt<C>: Stream<Item = Result<StreamEvent<C>>> + Sized {
    /// Transform the content of every `Next` frame.
    fn map_content<D, F>(self, f: F) -> MapContent<Self, F>
    where
        F: FnMut(C) -> D,
    {
        MapContent::new(self, f)
    }

    /// Repacketize into segments of exactly `MS` milliseconds.
    fn segmented<const MS: u64>(self) -> Segmented<Self, Segmenter<C, MS>>
    where
        C: Splittable,
    {
        Segmented::new(self, Segmenter::new())
    }
}

impl<C, S> EventStreamExt<C> for S where S: Stream<Item = Result<StreamEvent<C>>> {}

/// Strip the [`Segment`] wrapper from every frame.
pub fn unsegmented<S, C, const MS: u64>(stream: S) -> MapContent<S, fn(Segment<C, MS>) -> C>
where
    S: Stream<Item = Result<StreamEvent<Segment<C, MS>>>>,
{
    MapContent::new(stream, Segment::into_inner as fn(Segment<C, MS>) -> C)
}
