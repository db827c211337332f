//! Fixed-duration repacketization
//!
//! Cuts frames of arbitrary duration into [`Segment`]s of exactly `MS`
//! milliseconds. Content is never dropped: a remainder shorter than the
//! target waits for the next frame.
//!
//! Splitting one input into several outputs, or merging several inputs into
//! one output, changes the frame count. A running sequence offset keeps the
//! output numbering dense anyway.

use futures::Stream;
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, trace};

use crate::types::{FixedDuration, Frame, Segment, Splittable, StreamEvent, Tick};
use crate::{Result, SyncError};

/// Segmentation state for one stream.
#[derive(Debug)]
pub struct Segmenter<C, const MS: u64> {
    sequence_offset: i64,
    leftover: Option<C>,
}

impl<C: Splittable, const MS: u64> Default for Segmenter<C, MS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Splittable, const MS: u64> Segmenter<C, MS> {
    /// Create a segmenter.
    ///
    /// # Panics
    ///
    /// Panics if `MS` milliseconds cannot be cut from `C` exactly; see
    /// [`Segmenter::check_target`].
    pub fn new() -> Self {
        if let Err(e) = Self::check_target() {
            panic!("{e}");
        }
        Self { sequence_offset: 0, leftover: None }
    }

    /// Whether `C` can be cut into pieces of exactly `MS` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] for a zero target or one that does not
    /// fall on a split point of `C` (e.g. 5 ms of 44.1 kHz PCM).
    pub fn check_target() -> Result<()> {
        let target = <Segment<C, MS> as FixedDuration>::DURATION;
        if C::is_split_point(target) {
            Ok(())
        } else {
            Err(SyncError::config(
                "segment_duration_ms",
                format!("{}ms is not a whole number of content units", MS),
            ))
        }
    }

    /// Duration of content waiting for more input.
    pub fn buffered(&self) -> Tick {
        self.leftover.as_ref().map_or(Tick::ZERO, |c| c.duration())
    }

    /// Current shift applied to input sequence numbers.
    pub fn sequence_offset(&self) -> i64 {
        self.sequence_offset
    }

    /// Process one event, appending the resulting events to `out`.
    ///
    /// A `Start` is forwarded and clears the leftover and offset of the
    /// previous run.
    pub fn push(&mut self, event: StreamEvent<C>, out: &mut impl Extend<StreamEvent<Segment<C, MS>>>) {
        match event {
            StreamEvent::Start(context) => {
                if let Some(leftover) = self.leftover.take() {
                    debug!("Discarding {} of leftover content at run start", leftover.duration());
                }
                self.sequence_offset = 0;
                out.extend(Some(StreamEvent::Start(context)));
            }
            StreamEvent::Next(frame) => self.push_frame(frame, out),
        }
    }

    /// Process one event, returning the resulting events.
    pub fn process(&mut self, event: StreamEvent<C>) -> Vec<StreamEvent<Segment<C, MS>>> {
        let mut out = Vec::new();
        self.push(event, &mut out);
        out
    }

    fn push_frame(&mut self, frame: Frame<C>, out: &mut impl Extend<StreamEvent<Segment<C, MS>>>) {
        let Frame { timestamp, sequence, content } = frame;
        let target = <Segment<C, MS> as FixedDuration>::DURATION;

        // Pretend the combined buffer began when the leftover arrived
        let (mut buffer, mut time_offset) = match self.leftover.take() {
            Some(leftover) => {
                let shift = -leftover.duration();
                (leftover.concat(content), shift)
            }
            None => (content, Tick::ZERO),
        };

        if buffer.is_empty() {
            self.sequence_offset -= 1;
            return;
        }

        let emit = |content: C, time_offset: Tick, sequence_offset: i64| {
            StreamEvent::Next(Frame::new(
                timestamp + time_offset,
                sequence.offset(sequence_offset),
                Segment::new(content),
            ))
        };

        while !buffer.is_empty() {
            if buffer.duration() == target {
                out.extend(Some(emit(buffer, time_offset, self.sequence_offset)));
                return;
            }

            match buffer.split_at(target) {
                Ok((head, tail)) => {
                    out.extend(Some(emit(head, time_offset, self.sequence_offset)));
                    self.sequence_offset += 1;
                    time_offset += target;
                    buffer = tail;
                }
                Err(remainder) => {
                    trace!("Holding {} until more content arrives", remainder.duration());
                    self.sequence_offset -= 1;
                    self.leftover = Some(remainder);
                    return;
                }
            }
        }

        // Last split left nothing behind
        self.sequence_offset -= 1;
    }
}

/// A stateful stage that turns each input event into zero or more output events.
pub trait EventTransform {
    type Input;
    type Output;

    /// Process one event, appending the results to `out`.
    fn transform(&mut self, event: StreamEvent<Self::Input>, out: &mut VecDeque<StreamEvent<Self::Output>>);

    /// Content held back when the input ends.
    fn buffered(&self) -> Tick;
}

impl<C: Splittable, const MS: u64> EventTransform for Segmenter<C, MS> {
    type Input = C;
    type Output = Segment<C, MS>;

    fn transform(&mut self, event: StreamEvent<C>, out: &mut VecDeque<StreamEvent<Segment<C, MS>>>) {
        self.push(event, out);
    }

    fn buffered(&self) -> Tick {
        Segmenter::buffered(self)
    }
}

pin_project! {
    /// A stream combinator that runs an [`EventTransform`] such as the
    /// [`Segmenter`] over an event stream
    pub struct Segmented<S, T: EventTransform> {
        #[pin]
        stream: S,
        transform: T,
        ready: VecDeque<StreamEvent<T::Output>>,
    }
}

impl<S, T: EventTransform> Segmented<S, T> {
    pub fn new(stream: S, transform: T) -> Self {
        Self { stream, transform, ready: VecDeque::new() }
    }
}

impl<S, T> Stream for Segmented<S, T>
where
    S: Stream<Item = Result<StreamEvent<T::Input>>>,
    T: EventTransform,
{
    type Item = Result<StreamEvent<T::Output>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(event) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => this.transform.transform(event, this.ready),
                Poll::Ready(Some(Err(e))) => return Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => {
                    let buffered = this.transform.buffered();
                    if buffered > Tick::ZERO {
                        debug!("Stream ended with {} of unsegmented content", buffered);
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
