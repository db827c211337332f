//! Frame and stream event types

use bytes::Bytes;

use super::{SequenceNumber, SourceId, Tick};

/// Start of a logical run.
///
/// Timing and numbering of every following frame are relative to this
/// context until the next one arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameContext {
    /// Who produced the run
    pub source: SourceId,

    /// Run-relative start tick, usually zero
    pub start_tick: Tick,

    /// Sequence number of the first frame in the run
    pub start_sequence: SequenceNumber,

    /// Opaque per-run header
    pub header: Bytes,
}

impl FrameContext {
    /// Context for a run starting at tick zero, sequence zero, with an empty header.
    pub fn new(source: SourceId) -> Self {
        Self { source, start_tick: Tick::ZERO, start_sequence: SequenceNumber::ZERO, header: Bytes::new() }
    }
}

/// One unit of content within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<C> {
    pub timestamp: Tick,
    pub sequence: SequenceNumber,
    pub content: C,
}

impl<C> Frame<C> {
    pub fn new(timestamp: Tick, sequence: SequenceNumber, content: C) -> Self {
        Self { timestamp, sequence, content }
    }

    /// Replace the content, keeping timestamp and sequence.
    pub fn map_content<D>(self, f: impl FnOnce(C) -> D) -> Frame<D> {
        Frame { timestamp: self.timestamp, sequence: self.sequence, content: f(self.content) }
    }
}

/// An element of a (possibly discontinuous) media flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent<C> {
    /// A new run begins
    Start(FrameContext),

    /// The next frame of the current run
    Next(Frame<C>),
}

impl<C> StreamEvent<C> {
    /// Transform the frame content; `Start` passes through.
    pub fn map_content<D>(self, f: impl FnOnce(C) -> D) -> StreamEvent<D> {
        match self {
            StreamEvent::Start(context) => StreamEvent::Start(context),
            StreamEvent::Next(frame) => StreamEvent::Next(frame.map_content(f)),
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, StreamEvent::Start(_))
    }

    /// The frame, if this is a `Next` event.
    pub fn frame(&self) -> Option<&Frame<C>> {
        match self {
            StreamEvent::Start(_) => None,
            StreamEvent::Next(frame) => Some(frame),
        }
    }

    /// Consume into the frame, if this is a `Next` event.
    pub fn into_frame(self) -> Option<Frame<C>> {
        match self {
            StreamEvent::Start(_) => None,
            StreamEvent::Next(frame) => Some(frame),
        }
    }
}
