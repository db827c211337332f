//! Test utilities for generating media content
//!
//! Shared by unit tests and benchmarks.

#![cfg(any(test, feature = "benchmark"))]

use crate::types::{Frame, FrameContext, Pcm, PcmFormat, SequenceNumber, SourceId, StreamEvent, Tick};

/// PCM of `ms` milliseconds whose bytes count up from `seed`.
///
/// Distinct seeds make content easy to tell apart after splitting.
pub fn ramp_pcm<F: PcmFormat>(ms: u64, seed: u8) -> Pcm<F> {
    let len = Tick::from_millis(ms).to_samples(F::SAMPLE_RATE) as usize * F::FRAME_BYTES;
    Pcm::new((0..len).map(|i| seed.wrapping_add(i as u8)).collect::<Vec<u8>>())
}

/// One run of frames with the given durations, timestamped back to back.
pub fn pcm_run<F: PcmFormat>(durations_ms: &[u64]) -> Vec<StreamEvent<Pcm<F>>> {
    let mut events = Vec::with_capacity(durations_ms.len() + 1);
    events.push(StreamEvent::Start(FrameContext::new(SourceId::random())));

    let mut at = Tick::ZERO;
    let mut sequence = SequenceNumber::ZERO;
    for (index, ms) in durations_ms.iter().enumerate() {
        let content = ramp_pcm::<F>(*ms, index as u8);
        events.push(StreamEvent::Next(Frame::new(at, sequence.post_increment(), content)));
        at += Tick::from_millis(*ms);
    }
    events
}
