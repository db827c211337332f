//! End-to-end: UDP datagrams through the segmenter and the frame ring

use std::time::Duration;

use futures::StreamExt;
use mediasync::types::{Content, Discontinuous, L16Mono8k, L16Stereo44k, Pcm, SequenceNumber, StreamEvent, Tick};
use mediasync::{BindPreference, EventStreamExt, MediaSync, SyncConfig, SyncError, event_stream, unsegmented};
use tokio::net::UdpSocket;

type Narrowband = Pcm<L16Mono8k>;

fn localhost_config() -> SyncConfig {
    let mut config = SyncConfig::default();
    config.udp.bind = BindPreference::Localhost;
    config.ring.capacity = 16;
    config
}

#[tokio::test]
async fn datagrams_arrive_as_fixed_segments() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let mut pipeline = MediaSync::spawn_pipeline::<Narrowband, 20>(&localhost_config()).await?;
    assert_eq!(pipeline.source.poll_target(), Tick::from_millis(20));

    // Three 30ms datagrams: four 20ms segments plus 10ms held back
    let sender = UdpSocket::bind("127.0.0.1:0").await?;
    let mut sent = Vec::new();
    for index in 0..3u8 {
        let datagram: Vec<u8> = (0..480).map(|i| index.wrapping_mul(31).wrapping_add(i as u8)).collect();
        sender.send_to(&datagram, pipeline.local_addr).await?;
        sent.extend_from_slice(&datagram);
    }

    assert!(pipeline.source.next().await.is_start());

    let mut received = Vec::new();
    let mut sequences = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        while received.len() < 4 {
            if let StreamEvent::Next(frame) = pipeline.source.next().await {
                sequences.push(frame.sequence);
                if let Discontinuous::Got(segment) = frame.content {
                    received.push(segment);
                }
            }
        }
    })
    .await?;

    let mut rebuilt = Vec::new();
    for segment in &received {
        assert_eq!(segment.duration(), Tick::from_millis(20));
        rebuilt.extend_from_slice(segment.as_bytes());
    }
    assert_eq!(rebuilt, sent[..4 * 320]);

    // The consumer numbers every frame it emits, gaps included
    for (index, sequence) in sequences.iter().enumerate() {
        assert_eq!(*sequence, SequenceNumber::new(index as u32));
    }

    let report = pipeline.driver.shutdown().await?;
    assert!(report.cancelled);
    assert_eq!(report.sink.frames, 4);
    assert_eq!(report.sink.runs, 1);
    Ok(())
}

#[tokio::test]
async fn segments_unwrap_to_plain_content() -> anyhow::Result<()> {
    let source = MediaSync::listen(&localhost_config().udp).await?;
    let target = source.local_addr();

    let sender = UdpSocket::bind("127.0.0.1:0").await?;
    sender.send_to(&[9u8; 640], target).await?;

    let events = event_stream(source).map_content(Narrowband::from).segmented::<20>();
    let mut plain = Box::pin(unsegmented(events));

    let mut frames = Vec::new();
    while frames.len() < 2 {
        let event = tokio::time::timeout(Duration::from_secs(2), plain.next()).await?.expect("stream continues")?;
        if let StreamEvent::Next(frame) = event {
            frames.push(frame);
        }
    }

    assert_eq!(frames[0].sequence, SequenceNumber::new(0));
    assert_eq!(frames[1].sequence, SequenceNumber::new(1));
    assert_eq!(frames[1].timestamp - frames[0].timestamp, Tick::from_millis(20));
    assert!(frames.iter().all(|frame| frame.content.len() == 320));
    Ok(())
}

#[tokio::test]
async fn conflicting_poll_target_defers_to_segment_type() -> anyhow::Result<()> {
    let mut config = localhost_config();
    config.ring.poll_target_ms = Some(50);

    let pipeline = MediaSync::spawn_pipeline::<Narrowband, 20>(&config).await?;
    assert_eq!(pipeline.source.poll_target(), Tick::from_millis(20));
    Ok(())
}

#[tokio::test]
async fn unusable_segment_duration_is_rejected_before_binding() {
    let err = MediaSync::spawn_pipeline::<Narrowband, 0>(&localhost_config()).await.err();
    assert!(matches!(err, Some(SyncError::Config { ref field, .. }) if field == "segment_duration_ms"));

    let err = MediaSync::spawn_pipeline::<Pcm<L16Stereo44k>, 5>(&localhost_config()).await.err();
    assert!(matches!(err, Some(SyncError::Config { .. })));
}
