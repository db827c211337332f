//! Core types for real-time media flows.
//!
//! This module provides the shared vocabulary of every pipeline stage:
//! time, numbering, sender identity, frames and the events that carry them.
//!
//! ## Architecture
//!
//! - [`Tick`] is exact media time at a fixed rate, convertible to wall-clock time
//! - [`SequenceNumber`] numbers frames within a run and wraps at 32 bits
//! - [`SourceId`] distinguishes senders
//! - [`StreamEvent`] is either the [`FrameContext`] opening a run or the next [`Frame`]
//! - [`Content`] and [`Splittable`] describe what the core needs from a payload
//! - [`Segment`] wraps content cut to a static duration
//! - [`Discontinuous`] marks synthesized gaps
//!
//! ## Run semantics
//!
//! Within one `Start`, `Next*` run, sequence numbers increase by exactly one
//! per frame and timestamps never go backwards relative to the run start.
//!
//! ## Usage Example
//!
//! ```rust
//! use mediasync::types::{Content, Frame, FrameContext, L16Mono8k, Pcm, SequenceNumber, SourceId, StreamEvent, Tick};
//!
//! let start = StreamEvent::<Pcm<L16Mono8k>>::Start(FrameContext::new(SourceId::random()));
//! assert!(start.is_start());
//!
//! // 20 ms of 8 kHz 16-bit mono
//! let pcm = Pcm::<L16Mono8k>::new(vec![0u8; 320]);
//! assert_eq!(pcm.duration(), Tick::from_millis(20));
//!
//! let next = StreamEvent::Next(Frame::new(Tick::ZERO, SequenceNumber::ZERO, pcm));
//! assert_eq!(next.frame().map(|f| f.sequence), Some(SequenceNumber::ZERO));
//! ```

mod content;
mod frame;
mod pcm;
mod segment;
mod sequence;
mod source_id;
mod tick;

// Re-export all public types
pub use content::{Content, FixedDuration, Splittable};
pub use frame::{Frame, FrameContext, StreamEvent};
pub use pcm::{L16Mono8k, L16Mono16k, L16Stereo44k, L16Stereo48k, Pcm, PcmFormat};
pub use segment::{Discontinuous, Segment};
pub use sequence::SequenceNumber;
pub use source_id::SourceId;
pub use tick::Tick;
