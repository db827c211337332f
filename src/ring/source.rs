//! Consumer side of the frame ring

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use super::queue::{RingPayload, RingQueue};
use crate::{Result, SyncError};
use crate::provider::EventSource;
use crate::types::{Content, Discontinuous, Frame, FrameContext, SequenceNumber, SourceId, StreamEvent, Tick};

/// Default time the consumer waits for data before counting a stall.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Consumer of a frame ring, running on its own clock.
///
/// Every element taken from the ring becomes `Next(Got(content))` with a
/// timestamp and sequence number generated here. When nothing arrives for
/// longer than the poll target, `Next(Missing)` frames fill the gap.
pub struct FrameRingSource<C> {
    queue: Arc<RingQueue<C>>,
    source: SourceId,
    poll_target: Tick,
    poll_target_duration: Duration,
    poll_interval: Duration,
    tick: Tick,
    sequence: SequenceNumber,
    since_input: Duration,
    started: bool,
    stats: SourceStats,
}

/// Running totals for a ring source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Real frames delivered
    pub delivered: u64,

    /// Delivered frames that were inserted on overflow
    pub overflowed: u64,

    /// Synthesized gap frames
    pub missing: u64,
}

impl<C: Content> FrameRingSource<C> {
    pub(crate) fn new(queue: Arc<RingQueue<C>>, poll_target: Tick, poll_interval: Duration) -> Self {
        Self {
            queue,
            source: SourceId::random(),
            poll_target,
            poll_target_duration: poll_target.to_duration(),
            poll_interval,
            tick: Tick::ZERO,
            sequence: SequenceNumber::ZERO,
            since_input: Duration::ZERO,
            started: false,
            stats: SourceStats::default(),
        }
    }

    /// Use a different polling interval.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] for a zero interval, which would never
    /// let a stall accumulate.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Result<Self> {
        if poll_interval.is_zero() {
            return Err(SyncError::config("ring.poll_interval_ms", "must be greater than zero"));
        }
        self.poll_interval = poll_interval;
        Ok(self)
    }

    /// Identity announced in this source's `Start` event.
    pub fn source_id(&self) -> SourceId {
        self.source
    }

    pub fn poll_target(&self) -> Tick {
        self.poll_target
    }

    pub fn stats(&self) -> SourceStats {
        self.stats
    }

    /// Produce the next event. Never ends on its own.
    pub async fn next(&mut self) -> StreamEvent<Discontinuous<C>> {
        if !self.started {
            self.started = true;
            debug!("Ring source {} started (poll target {})", self.source, self.poll_target);
            return StreamEvent::Start(FrameContext {
                source: self.source,
                start_tick: self.tick,
                start_sequence: self.sequence,
                header: Default::default(),
            });
        }

        let queue = Arc::clone(&self.queue);
        loop {
            let arrived = tokio::select! {
                element = queue.pop() => Some(element),
                _ = tokio::time::sleep(self.poll_interval) => None,
            };

            match arrived {
                Some(element) => return self.deliver(element),
                None => {
                    self.since_input += self.poll_interval;
                    if self.since_input > self.poll_target_duration {
                        self.since_input -= self.poll_target_duration;
                        return self.gap();
                    }
                }
            }
        }
    }

    fn deliver(&mut self, element: RingPayload<C>) -> StreamEvent<Discontinuous<C>> {
        if let Some(lost) = element.lost() {
            trace!("Delivering overflow element; {} was lost before it", lost.duration());
            self.stats.overflowed += 1;
        }
        let content = element.into_kept();
        let duration = content.duration();
        let frame = Frame::new(self.tick, self.sequence.post_increment(), Discontinuous::Got(content));

        self.tick += duration;
        self.since_input = Duration::ZERO;
        self.stats.delivered += 1;
        StreamEvent::Next(frame)
    }

    fn gap(&mut self) -> StreamEvent<Discontinuous<C>> {
        trace!("No input for {}; synthesizing missing frame {}", self.poll_target, self.sequence);
        let frame = Frame::new(self.tick, self.sequence.post_increment(), Discontinuous::Missing);

        self.tick += self.poll_target;
        self.stats.missing += 1;
        StreamEvent::Next(frame)
    }
}

#[async_trait::async_trait]
impl<C: Content> EventSource for FrameRingSource<C> {
    type Content = Discontinuous<C>;

    async fn next_event(&mut self) -> Result<Option<StreamEvent<Discontinuous<C>>>> {
        Ok(Some(self.next().await))
    }
}
