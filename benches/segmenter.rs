//! Benchmarks for fixed-duration repacketization
//!
//! Covers the three segmenter paths:
//! - Exact frames wrapped as-is
//! - Long frames split into several segments
//! - Short frames merged through the leftover buffer
//!
//! Platform: Cross-platform, CI-safe

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use mediasync::Segmenter;
use mediasync::test_utils::{pcm_run, ramp_pcm};
use mediasync::types::{Frame, L16Stereo48k, Pcm, SequenceNumber, StreamEvent, Tick};
use std::hint::black_box;

type Wideband = Pcm<L16Stereo48k>;

fn bench_frame_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmenter_frame_shapes");

    for (name, ms) in [("exact_20ms", 20u64), ("split_100ms", 100), ("merge_5ms", 5)] {
        let content = ramp_pcm::<L16Stereo48k>(ms, 0);
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_function(name, |b| {
            let mut segmenter = Segmenter::<Wideband, 20>::new();
            let mut sequence = SequenceNumber::ZERO;
            b.iter(|| {
                let event = StreamEvent::Next(Frame::new(Tick::ZERO, sequence.post_increment(), content.clone()));
                black_box(segmenter.process(black_box(event)))
            })
        });
    }

    group.finish();
}

fn bench_jittery_run(c: &mut Criterion) {
    // Packet sizes typical of a jittery sender
    let durations: Vec<u64> = [10, 30, 20, 40, 5, 15, 20, 60].repeat(16);

    c.bench_function("segmenter_jittery_run", |b| {
        b.iter_batched(
            || pcm_run::<L16Stereo48k>(&durations),
            |run| {
                let mut segmenter = Segmenter::<Wideband, 20>::new();
                let mut out = Vec::new();
                for event in run {
                    segmenter.push(event, &mut out);
                }
                black_box(out)
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_frame_shapes, bench_jittery_run);
criterion_main!(benches);
