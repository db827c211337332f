//! Linear PCM content

use std::fmt;
use std::marker::PhantomData;

use bytes::{Bytes, BytesMut};
use tracing::debug;

use super::{Content, Splittable, Tick};

/// Static description of an interleaved linear PCM layout.
pub trait PcmFormat: Send + Sync + 'static {
    const SAMPLE_RATE: u32;
    const CHANNELS: u16;
    const BYTES_PER_SAMPLE: u16;
    const NAME: &'static str;

    /// Bytes in one sample frame (one sample per channel).
    const FRAME_BYTES: usize = Self::CHANNELS as usize * Self::BYTES_PER_SAMPLE as usize;
}

/// 16-bit mono at 8 kHz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L16Mono8k;

impl PcmFormat for L16Mono8k {
    const SAMPLE_RATE: u32 = 8_000;
    const CHANNELS: u16 = 1;
    const BYTES_PER_SAMPLE: u16 = 2;
    const NAME: &'static str = "L16/8000/1";
}

/// 16-bit mono at 16 kHz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L16Mono16k;

impl PcmFormat for L16Mono16k {
    const SAMPLE_RATE: u32 = 16_000;
    const CHANNELS: u16 = 1;
    const BYTES_PER_SAMPLE: u16 = 2;
    const NAME: &'static str = "L16/16000/1";
}

/// 16-bit stereo at 48 kHz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L16Stereo48k;

impl PcmFormat for L16Stereo48k {
    const SAMPLE_RATE: u32 = 48_000;
    const CHANNELS: u16 = 2;
    const BYTES_PER_SAMPLE: u16 = 2;
    const NAME: &'static str = "L16/48000/2";
}

/// 16-bit stereo at 44.1 kHz
///
/// Only whole multiples of 10 ms hold a whole number of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L16Stereo44k;

impl PcmFormat for L16Stereo44k {
    const SAMPLE_RATE: u32 = 44_100;
    const CHANNELS: u16 = 2;
    const BYTES_PER_SAMPLE: u16 = 2;
    const NAME: &'static str = "L16/44100/2";
}

/// Interleaved PCM bytes in format `F`.
///
/// Duration counts whole sample frames; a trailing partial frame is carried
/// along but not timed. Joining after a partial frame keeps every byte but
/// shifts the sample alignment of whatever follows.
pub struct Pcm<F> {
    data: Bytes,
    _format: PhantomData<fn() -> F>,
}

impl<F: PcmFormat> Pcm<F> {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into(), _format: PhantomData }
    }

    /// `duration` of silence.
    pub fn silence(duration: Tick) -> Self {
        let len = duration.to_samples(F::SAMPLE_RATE) as usize * F::FRAME_BYTES;
        Self::new(vec![0u8; len])
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whole sample frames held.
    pub fn sample_frames(&self) -> u64 {
        (self.data.len() / F::FRAME_BYTES) as u64
    }
}

impl<F: PcmFormat> Content for Pcm<F> {
    fn duration(&self) -> Tick {
        Tick::from_samples(self.sample_frames(), F::SAMPLE_RATE)
    }

    fn materialize(&self) -> Self {
        Self::new(Bytes::copy_from_slice(&self.data))
    }
}

impl<F: PcmFormat> Splittable for Pcm<F> {
    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn concat(self, other: Self) -> Self {
        if self.data.is_empty() {
            return other;
        }
        if other.data.is_empty() {
            return self;
        }
        let stray = self.data.len() % F::FRAME_BYTES;
        if stray != 0 {
            debug!("{} content ends {} bytes into a sample frame; following samples are misaligned", F::NAME, stray);
        }
        let mut joined = BytesMut::with_capacity(self.data.len() + other.data.len());
        joined.extend_from_slice(&self.data);
        joined.extend_from_slice(&other.data);
        Self::new(joined.freeze())
    }

    fn is_split_point(at: Tick) -> bool {
        let samples = at.to_samples(F::SAMPLE_RATE);
        samples > 0 && Tick::from_samples(samples, F::SAMPLE_RATE) == at
    }

    fn split_at(mut self, at: Tick) -> Result<(Self, Self), Self> {
        if !Self::is_split_point(at) {
            return Err(self);
        }
        let split = at.to_samples(F::SAMPLE_RATE) as usize * F::FRAME_BYTES;
        if split > self.data.len() {
            return Err(self);
        }
        let head = self.data.split_to(split);
        Ok((Self::new(head), self))
    }
}

impl<F> Clone for Pcm<F> {
    fn clone(&self) -> Self {
        Self { data: self.data.clone(), _format: PhantomData }
    }
}

impl<F> PartialEq for Pcm<F> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<F> Eq for Pcm<F> {}

impl<F: PcmFormat> fmt::Debug for Pcm<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pcm")
            .field("format", &F::NAME)
            .field("bytes", &self.data.len())
            .field("duration", &self.duration())
            .finish()
    }
}

impl<F: PcmFormat> From<Bytes> for Pcm<F> {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Narrowband = Pcm<L16Mono8k>;

    #[test]
    fn duration_counts_whole_frames() {
        // 160 samples at 8 kHz plus one stray byte
        let pcm = Narrowband::new(vec![0u8; 321]);
        assert_eq!(pcm.sample_frames(), 160);
        assert_eq!(pcm.duration(), Tick::from_millis(20));
    }

    #[test]
    fn split_exact_prefix() {
        let bytes: Vec<u8> = (0..=255).cycle().take(640).collect();
        let pcm = Narrowband::new(bytes.clone());

        let (head, tail) = pcm.split_at(Tick::from_millis(20)).unwrap();
        assert_eq!(head.duration(), Tick::from_millis(20));
        assert_eq!(tail.duration(), Tick::from_millis(20));
        assert_eq!(head.as_bytes().as_ref(), &bytes[..320]);
        assert_eq!(tail.as_bytes().as_ref(), &bytes[320..]);
    }

    #[test]
    fn split_refuses_short_content() {
        let pcm = Narrowband::new(vec![1u8; 100]);
        let back = pcm.split_at(Tick::from_millis(20)).unwrap_err();
        assert_eq!(back.len(), 100);
    }

    #[test]
    fn split_refuses_zero_span() {
        let pcm = Narrowband::new(vec![1u8; 320]);
        let back = pcm.split_at(Tick::ZERO).unwrap_err();
        assert_eq!(back.len(), 320);
        assert!(!Narrowband::is_split_point(Tick::ZERO));
    }

    #[test]
    fn split_refuses_spans_between_samples() {
        // 5ms is 220.5 samples at 44.1 kHz
        let pcm = Pcm::<L16Stereo44k>::silence(Tick::from_millis(20));
        assert!(!Pcm::<L16Stereo44k>::is_split_point(Tick::from_millis(5)));
        assert!(Pcm::<L16Stereo44k>::is_split_point(Tick::from_millis(10)));

        let pcm = pcm.split_at(Tick::from_millis(5)).unwrap_err();
        let (head, _) = pcm.split_at(Tick::from_millis(10)).unwrap();
        assert_eq!(head.duration(), Tick::from_millis(10));
    }

    #[test]
    fn concat_after_partial_frame_keeps_bytes() {
        let joined = Narrowband::new(vec![1u8, 2, 3]).concat(Narrowband::new(vec![4u8, 5, 6]));
        assert_eq!(joined.as_bytes().as_ref(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(joined.sample_frames(), 3);
    }

    #[test]
    fn concat_preserves_order() {
        let joined = Narrowband::new(vec![1u8, 2]).concat(Narrowband::new(vec![3u8, 4]));
        assert_eq!(joined.as_bytes().as_ref(), &[1, 2, 3, 4]);
        assert!(Narrowband::new(Bytes::new()).is_empty());
    }

    #[test]
    fn materialize_detaches_storage() {
        let original = Narrowband::new(vec![9u8; 32]);
        let copy = original.materialize();
        assert_eq!(copy, original);
        assert_ne!(copy.as_bytes().as_ptr(), original.as_bytes().as_ptr());
    }

    #[test]
    fn silence_has_requested_duration() {
        let silence = Pcm::<L16Stereo48k>::silence(Tick::from_millis(10));
        assert_eq!(silence.len(), 480 * 4);
        assert_eq!(silence.duration(), Tick::from_millis(10));
    }
}
