//! Real-time media ingest and synchronization.
//!
//! `mediasync` turns jittery, variably framed network packets into a steady,
//! gap-aware frame stream.
//!
//! # Features
//!
//! - **UDP Frame Source**: one frame per datagram, runs split by sender
//! - **Segmenter**: repacketizes arbitrary frames into fixed-duration segments
//!   with dense sequence numbers
//! - **Frame Ring**: lossy bounded buffer between producer and consumer timing
//!   domains, synthesizing `Missing` frames on stall
//! - **Exact timing**: integer [`Tick`]s at a rate shared by ms and audio sample clocks
//!
//! Everything speaks the same currency: a stream of
//! `Result<`[`StreamEvent`]`<C>>` where each run opens with
//! `Start(FrameContext)` followed by `Next(Frame)` events.
//!
//! ## Example (UDP to fixed 20 ms segments)
//!
//! ```rust,no_run
//! use mediasync::{MediaSync, SyncConfig};
//! use mediasync::types::{Discontinuous, L16Mono8k, Pcm, StreamEvent};
//!
//! #[tokio::main]
//! async fn main() -> mediasync::Result<()> {
//!     let config = SyncConfig::from_yaml("udp:\n  port: 5004\nring:\n  capacity: 8\n")?;
//!     let mut pipeline = MediaSync::spawn_pipeline::<Pcm<L16Mono8k>, 20>(&config).await?;
//!
//!     loop {
//!         match pipeline.source.next().await {
//!             StreamEvent::Start(context) => println!("run from {}", context.source),
//!             StreamEvent::Next(frame) => match frame.content {
//!                 Discontinuous::Got(segment) => println!("{} bytes", segment.len()),
//!                 Discontinuous::Missing => println!("gap at {}", frame.timestamp),
//!             },
//!         }
//!     }
//! }
//! ```

// Core types and error handling
pub mod clock;
pub mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Stream-based pipeline architecture
pub mod driver;
pub mod provider;
pub mod providers;
pub mod ring;
pub mod stream;

// Core exports
pub use config::{BindPreference, RingConfig, SyncConfig, UdpSourceConfig};
pub use error::*;
pub use types::*;

// Main API exports
pub use driver::{Driver, DriverHandle, DriverReport};
pub use provider::{EventSource, event_stream};
pub use providers::UdpFrameSource;
pub use ring::{FrameRing, FrameRingSink, FrameRingSource, RingPayload};
pub use stream::{EventStreamExt, Segmenter, unsegmented};

use bytes::Bytes;
use std::net::SocketAddr;
use tracing::info;

/// A running ingest chain: UDP source, segmenter and ring producer in one
/// task, the ring consumer in the caller's hands.
pub struct Pipeline<C> {
    /// Consumer side of the ring
    pub source: FrameRingSource<C>,

    /// Producer task; dropping it stops ingest and releases the socket
    pub driver: DriverHandle,

    /// Address the UDP source is bound to
    pub local_addr: SocketAddr,
}

/// Unified entry point for building ingest components from configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use mediasync::{MediaSync, UdpSourceConfig, BindPreference};
///
/// #[tokio::main]
/// async fn main() -> mediasync::Result<()> {
///     let source = MediaSync::listen(&UdpSourceConfig::new(0, BindPreference::Localhost)).await?;
///     println!("listening on {}", source.local_addr());
///     Ok(())
/// }
/// ```
pub struct MediaSync;

impl MediaSync {
    /// Bind a UDP frame source.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Bind`] if the socket cannot be bound. The bind is
    /// not retried.
    pub async fn listen(config: &UdpSourceConfig) -> Result<UdpFrameSource> {
        UdpFrameSource::bind(config).await
    }

    /// Create a frame ring.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] for a zero capacity or poll interval.
    pub fn ring<C: Content>(config: &RingConfig) -> Result<FrameRing<C>> {
        FrameRing::from_config(config)
    }

    /// Bind a UDP source and spawn the producer chain
    /// `UDP -> C -> Segment<C, MS> -> ring`.
    ///
    /// The consumer's poll target is the segment duration; a conflicting
    /// `ring.poll_target_ms` is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] for invalid configuration or an `MS`
    /// that `C` cannot be cut into, and [`SyncError::Bind`] if the socket
    /// cannot be bound.
    pub async fn spawn_pipeline<C, const MS: u64>(config: &SyncConfig) -> Result<Pipeline<Segment<C, MS>>>
    where
        C: Splittable + From<Bytes>,
    {
        config.validate()?;
        config.check_segment_duration(MS);
        Segmenter::<C, MS>::check_target()?;

        let ring = FrameRing::<Segment<C, MS>>::from_config(&config.ring)?;
        let poll_target = config.ring.resolve_poll_target(Some(<Segment<C, MS> as FixedDuration>::DURATION))?;

        let udp = Self::listen(&config.udp).await?;
        let local_addr = udp.local_addr();

        let events = event_stream(udp).map_content(<C as From<Bytes>>::from).segmented::<MS>();
        let driver = Driver::spawn(events, ring.sink());
        let source = ring.source_with_poll_target(poll_target);

        info!("Pipeline running on {} ({}ms segments, ring capacity {})", local_addr, MS, ring.capacity());

        Ok(Pipeline { source, driver, local_addr })
    }
}
