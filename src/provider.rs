//! Event source trait for pull-driven pipeline stages

use futures::Stream;

use crate::Result;
use crate::types::StreamEvent;

/// Trait for stages that produce stream events on demand
///
/// Sources own their timing: the UDP source waits on the socket, the ring
/// source races its queue against a poll timer.
#[async_trait::async_trait]
pub trait EventSource: Send + 'static {
    type Content: Send + 'static;

    /// Get the next event
    ///
    /// Returns:
    /// - `Ok(Some(event))` - Next event available
    /// - `Ok(None)` - Source ended (normal termination)
    /// - `Err(e)` - Error occurred; the source should not be polled again
    async fn next_event(&mut self) -> Result<Option<StreamEvent<Self::Content>>>;
}

/// Adapt an [`EventSource`] into a `Stream`.
///
/// The stream owns the source, so dropping it releases whatever the source
/// holds. It ends after yielding the first error.
pub fn event_stream<P>(source: P) -> impl Stream<Item = Result<StreamEvent<P::Content>>> + Send + 'static
where
    P: EventSource,
{
    futures::stream::try_unfold(source, |mut source| async move {
        Ok(source.next_event().await?.map(|event| (event, source)))
    })
}
