//! Producer side of the frame ring

use futures::{Stream, StreamExt, pin_mut};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::queue::{PushOutcome, RingQueue};
use crate::Result;
use crate::types::{Content, StreamEvent};

/// Producer handle; clone it to feed one ring from several producers.
///
/// Frames lose their timestamp and sequence number here: the consumer side
/// numbers them again on its own clock.
pub struct FrameRingSink<C> {
    queue: Arc<RingQueue<C>>,
}

impl<C> Clone for FrameRingSink<C> {
    fn clone(&self) -> Self {
        Self { queue: Arc::clone(&self.queue) }
    }
}

/// What a sink did with one input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkReport {
    /// Frames pushed into the ring
    pub frames: u64,

    /// Runs seen (`Start` events)
    pub runs: u64,

    /// Pushes that evicted an older element
    pub overflows: u64,
}

impl<C: Content> FrameRingSink<C> {
    pub(crate) fn new(queue: Arc<RingQueue<C>>) -> Self {
        Self { queue }
    }

    /// Copy `content` into owned storage and enqueue it. Never blocks.
    pub fn push(&self, content: &C) -> PushOutcome {
        let outcome = self.queue.push(content.materialize());
        if outcome == PushOutcome::Overflowed {
            warn!("Frame ring full (capacity {}), dropped oldest element", self.queue.capacity());
        }
        outcome
    }

    /// Feed one event into the ring.
    ///
    /// `Start` events carry nothing the consumer uses and are only counted.
    pub fn accept(&self, event: StreamEvent<C>, report: &mut SinkReport) {
        match event {
            StreamEvent::Start(context) => {
                debug!("Ring sink: run from {} started", context.source);
                report.runs += 1;
            }
            StreamEvent::Next(frame) => {
                trace!("Ring sink: frame {} at {}", frame.sequence, frame.timestamp);
                if self.push(&frame.content) == PushOutcome::Overflowed {
                    report.overflows += 1;
                }
                report.frames += 1;
            }
        }
    }

    /// Drain `events` into the ring until the stream ends or fails.
    pub async fn consume<S>(&self, events: S) -> Result<SinkReport>
    where
        S: Stream<Item = Result<StreamEvent<C>>>,
    {
        pin_mut!(events);
        let mut report = SinkReport::default();
        while let Some(event) = events.next().await {
            self.accept(event?, &mut report);
        }
        debug!("Ring sink input ended: {:?}", report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::{FrameRing, RingPayload};
    use crate::types::{Frame, FrameContext, L16Mono8k, Pcm, SequenceNumber, SourceId, Tick};

    type Narrowband = Pcm<L16Mono8k>;

    fn frame(seq: u32, fill: u8) -> StreamEvent<Narrowband> {
        StreamEvent::Next(Frame::new(Tick::ZERO, SequenceNumber::new(seq), Narrowband::new(vec![fill; 320])))
    }

    #[test]
    fn push_copies_content() {
        let ring = FrameRing::new(2).unwrap();
        let sink = ring.sink();
        let original = Narrowband::new(vec![5u8; 320]);
        sink.push(&original);

        let drained = ring.drain();
        let stored = drained[0].kept();
        assert_eq!(stored, &original);
        assert_ne!(stored.as_bytes().as_ptr(), original.as_bytes().as_ptr());
    }

    #[tokio::test]
    async fn consume_strips_metadata_and_counts() {
        let ring = FrameRing::new(2).unwrap();
        let events: Vec<Result<StreamEvent<Narrowband>>> = vec![
            Ok(StreamEvent::Start(FrameContext::new(SourceId::random()))),
            Ok(frame(0, 1)),
            Ok(frame(1, 2)),
            Ok(frame(2, 3)),
        ];

        let report = ring.sink().consume(futures::stream::iter(events)).await.unwrap();
        assert_eq!(report, SinkReport { frames: 3, runs: 1, overflows: 1 });

        let drained = ring.drain();
        assert!(matches!(&drained[0], RingPayload::Payload(c) if c.as_bytes()[0] == 2));
        assert!(matches!(&drained[1], RingPayload::Overflow { lost, kept }
            if lost.as_bytes()[0] == 1 && kept.as_bytes()[0] == 3));
    }

    #[tokio::test]
    async fn consume_stops_at_error() {
        let ring = FrameRing::<Narrowband>::new(4).unwrap();
        let events = vec![Ok(frame(0, 1)), Err(crate::SyncError::closed("upstream")), Ok(frame(1, 2))];

        let result = ring.sink().consume(futures::stream::iter(events)).await;
        assert!(result.is_err());
        assert_eq!(ring.len(), 1);
    }
}
