//! Driver spawns and manages the producer side of a frame ring

use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::ring::{FrameRingSink, SinkReport};
use crate::types::{Content, StreamEvent};
use crate::{Result, SyncError};

/// Final state of a producer task.
#[derive(Debug)]
pub struct DriverReport {
    /// What reached the ring
    pub sink: SinkReport,

    /// The error that ended the input, if any
    pub error: Option<SyncError>,

    /// Whether the task stopped because it was cancelled
    pub cancelled: bool,
}

/// Handle to a running producer task
///
/// Dropping the handle cancels the task, which drops the input stream and
/// with it any socket the stream owns.
pub struct DriverHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<DriverReport>>,
}

impl DriverHandle {
    /// Token that stops the task when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Cancel the task and wait for its report.
    pub async fn shutdown(mut self) -> Result<DriverReport> {
        self.cancel.cancel();
        self.join().await
    }

    /// Wait for the task to end on its own.
    pub async fn join(&mut self) -> Result<DriverReport> {
        let task = self.task.take().ok_or_else(|| SyncError::closed("driver"))?;
        task.await.map_err(|e| SyncError::closed(format!("driver task ({e})")))
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            debug!("Dropping driver handle");
        }
        // Cancel the task on drop for clean shutdown
        self.cancel.cancel();
    }
}

/// Driver spawns the producer domain of a pipeline
///
/// The spawned task owns the input stream and pushes every frame into the
/// ring sink. It never waits on the consumer: the ring absorbs bursts by
/// dropping the oldest element.
pub struct Driver;

impl Driver {
    /// Spawn a task pumping `events` into `sink`
    pub fn spawn<S, C>(events: S, sink: FrameRingSink<C>) -> DriverHandle
    where
        S: Stream<Item = Result<StreamEvent<C>>> + Send + 'static,
        C: Content,
    {
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        let task = tokio::spawn(async move { Self::producer_task(events, sink, cancel_task).await });

        DriverHandle { cancel, task: Some(task) }
    }

    /// Producer task - forwards frames until input ends, fails, or is cancelled
    async fn producer_task<S, C>(events: S, sink: FrameRingSink<C>, cancel: CancellationToken) -> DriverReport
    where
        S: Stream<Item = Result<StreamEvent<C>>> + Send + 'static,
        C: Content,
    {
        info!("Producer task started");
        let mut events = Box::pin(events);
        let mut report = DriverReport { sink: SinkReport::default(), error: None, cancelled: false };

        loop {
            // Use select to allow cancellation while waiting for input
            let next = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Producer task cancelled");
                    report.cancelled = true;
                    break;
                }
                next = events.next() => next,
            };

            match next {
                Some(Ok(event)) => {
                    sink.accept(event, &mut report.sink);
                    trace!("Producer forwarded {} frames", report.sink.frames);
                }
                Some(Err(e)) => {
                    error!("Producer input failed: {}", e);
                    report.error = Some(e);
                    break;
                }
                None => {
                    info!("Producer input ended");
                    break;
                }
            }
        }

        info!(
            "Producer task ended ({} frames, {} runs, {} overflows)",
            report.sink.frames, report.sink.runs, report.sink.overflows
        );
        report
    }
}
