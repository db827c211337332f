//! UDP frame source
//!
//! Turns datagrams arriving on one socket into a `Start`/`Next` event
//! stream. Each datagram becomes exactly one frame, in arrival order; a
//! change of sender opens a new run.

use bytes::Bytes;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::clock::{Clock, MonotonicClock};
use crate::config::UdpSourceConfig;
use crate::provider::EventSource;
use crate::types::{Frame, FrameContext, SequenceNumber, SourceId, StreamEvent, Tick};
use crate::{Result, SyncError};

/// Largest UDP payload
const MAX_DATAGRAM: usize = 65_535;

/// Per-socket run state: who sent last, when their run began, what comes next.
#[derive(Debug)]
pub(crate) struct RunTracker {
    sender: Option<SourceId>,
    started_at: Option<Instant>,
    next_sequence: SequenceNumber,
}

/// Outcome of observing one datagram.
#[derive(Debug)]
pub(crate) struct Observation {
    pub(crate) start: Option<FrameContext>,
    pub(crate) timestamp: Tick,
    pub(crate) sequence: SequenceNumber,
}

impl RunTracker {
    pub(crate) fn new() -> Self {
        Self { sender: None, started_at: None, next_sequence: SequenceNumber::ZERO }
    }

    /// Record a datagram from `sender` received at `now`.
    pub(crate) fn observe(&mut self, sender: SourceId, now: Instant) -> Observation {
        let mut start = None;
        let started_at = match self.started_at {
            Some(started_at) if self.sender == Some(sender) => started_at,
            _ => {
                debug!("New run from {} (previous: {:?})", sender, self.sender.map(|s| s.to_string()));
                self.sender = Some(sender);
                self.started_at = Some(now);
                self.next_sequence = SequenceNumber::ZERO;
                start = Some(FrameContext::new(sender));
                now
            }
        };

        let timestamp = Tick::from_duration(now.saturating_duration_since(started_at));
        let sequence = self.next_sequence.post_increment();
        Observation { start, timestamp, sequence }
    }
}

/// Event source reading datagrams from a bound UDP socket
///
/// The socket is owned by the source and released when the source (or the
/// stream wrapping it) is dropped.
pub struct UdpFrameSource<K = MonotonicClock> {
    socket: UdpSocket,
    local_addr: SocketAddr,
    clock: K,
    buffer: Box<[u8]>,
    runs: RunTracker,
    pending: Option<Frame<Bytes>>,
    datagrams: u64,
}

impl UdpFrameSource<MonotonicClock> {
    /// Bind according to `config`.
    ///
    /// Bind failure is returned immediately and never retried.
    pub async fn bind(config: &UdpSourceConfig) -> Result<Self> {
        Self::bind_with_clock(config, MonotonicClock).await
    }
}

impl<K: Clock> UdpFrameSource<K> {
    /// Bind according to `config`, timestamping frames with `clock`.
    pub async fn bind_with_clock(config: &UdpSourceConfig, clock: K) -> Result<Self> {
        let addr = config.socket_addr();
        let socket = UdpSocket::bind(addr).await.map_err(|e| SyncError::bind_failed(addr, e))?;
        let local_addr = socket.local_addr().map_err(|e| SyncError::bind_failed(addr, e))?;

        info!("UDP frame source listening on {}", local_addr);

        Ok(Self {
            socket,
            local_addr,
            clock,
            buffer: vec![0u8; MAX_DATAGRAM].into_boxed_slice(),
            runs: RunTracker::new(),
            pending: None,
            datagrams: 0,
        })
    }

    /// The bound address, including the port chosen for port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Datagrams received so far.
    pub fn datagrams_received(&self) -> u64 {
        self.datagrams
    }
}

#[async_trait::async_trait]
impl<K: Clock> EventSource for UdpFrameSource<K> {
    type Content = Bytes;

    async fn next_event(&mut self) -> Result<Option<StreamEvent<Bytes>>> {
        if let Some(frame) = self.pending.take() {
            return Ok(Some(StreamEvent::Next(frame)));
        }

        let (len, origin) =
            self.socket.recv_from(&mut self.buffer).await.map_err(SyncError::receive_failed)?;
        let now = self.clock.now();
        self.datagrams += 1;

        let content = Bytes::copy_from_slice(&self.buffer[..len]);
        let observation = self.runs.observe(SourceId::from_addr(origin), now);
        let frame = Frame::new(observation.timestamp, observation.sequence, content);

        trace!("Datagram {} from {}: {} bytes, seq={}", self.datagrams, origin, len, frame.sequence);

        match observation.start {
            Some(context) => {
                self.pending = Some(frame);
                Ok(Some(StreamEvent::Start(context)))
            }
            None => Ok(Some(StreamEvent::Next(frame))),
        }
    }
}

impl<K> Drop for UdpFrameSource<K> {
    fn drop(&mut self) {
        debug!("Releasing UDP socket {} after {} datagrams", self.local_addr, self.datagrams);
    }
}
