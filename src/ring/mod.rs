//! Frame ring: a bounded, lossy buffer between two timing domains.
//!
//! A producer (usually a network source) pushes content through a
//! [`FrameRingSink`]; a consumer pulls it through a [`FrameRingSource`] on its
//! own schedule. The two sides share nothing but the queue.
//!
//! ## Overflow
//!
//! Producers never wait. When the ring is full the oldest element is evicted
//! and the new one is stored as [`RingPayload::Overflow`], remembering what
//! was lost.
//!
//! ## Underflow
//!
//! When the consumer finds nothing for longer than its poll target it emits
//! [`Discontinuous::Missing`](crate::types::Discontinuous) frames, letting the
//! caller insert silence or concealment.
//!
//! ```rust
//! use mediasync::ring::{FrameRing, RingPayload};
//! use mediasync::types::{L16Mono8k, Pcm};
//!
//! let ring = FrameRing::<Pcm<L16Mono8k>>::new(2).unwrap();
//! let sink = ring.sink();
//! for fill in [1u8, 2, 3] {
//!     sink.push(&Pcm::new(vec![fill; 320]));
//! }
//!
//! let drained = ring.drain();
//! assert!(matches!(drained[0], RingPayload::Payload(_)));
//! assert!(drained[1].is_overflow());
//! ```

mod queue;
mod sink;
mod source;

pub use queue::{PushOutcome, RingPayload};
pub use sink::{FrameRingSink, SinkReport};
pub use source::{DEFAULT_POLL_INTERVAL, FrameRingSource, SourceStats};

use std::sync::Arc;
use std::time::Duration;

use crate::config::RingConfig;
use crate::types::{Content, FixedDuration, Tick};
use crate::{Result, SyncError};
use queue::RingQueue;

/// Owner of a ring queue; hands out sinks and sources.
pub struct FrameRing<C> {
    queue: Arc<RingQueue<C>>,
    poll_interval: Duration,
}

impl<C: Content> FrameRing<C> {
    /// Create a ring holding at most `capacity` elements.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SyncError::config("ring.capacity", "must be greater than zero"));
        }
        Ok(Self { queue: Arc::new(RingQueue::new(capacity)), poll_interval: DEFAULT_POLL_INTERVAL })
    }

    /// Create a ring from configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        if config.poll_interval_ms == 0 {
            return Err(SyncError::config("ring.poll_interval_ms", "must be greater than zero"));
        }
        let mut ring = Self::new(config.capacity)?;
        ring.poll_interval = config.poll_interval();
        Ok(ring)
    }

    /// A producer handle.
    pub fn sink(&self) -> FrameRingSink<C> {
        FrameRingSink::new(Arc::clone(&self.queue))
    }

    /// A consumer polling for frames of the content type's own duration.
    pub fn source(&self) -> FrameRingSource<C>
    where
        C: FixedDuration,
    {
        self.source_with_poll_target(C::DURATION)
    }

    /// A consumer polling for frames of `poll_target` duration.
    pub fn source_with_poll_target(&self, poll_target: Tick) -> FrameRingSource<C> {
        FrameRingSource::new(Arc::clone(&self.queue), poll_target, self.poll_interval)
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Elements currently queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pushes that evicted an older element since creation.
    pub fn overflow_count(&self) -> u64 {
        self.queue.overflow_count()
    }

    /// Remove and return everything queued, oldest first.
    pub fn drain(&self) -> Vec<RingPayload<C>> {
        self.queue.drain()
    }
}
