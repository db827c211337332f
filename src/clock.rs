//! Monotonic time source

use tokio::time::Instant;

/// Supplies "now" to timing components.
///
/// Uses tokio's [`Instant`] so a paused test runtime drives every clock.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// The runtime's monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn follows_paused_runtime() {
        let clock = MonotonicClock;
        let before = clock.now();
        tokio::time::advance(Duration::from_millis(40)).await;
        assert_eq!(clock.now() - before, Duration::from_millis(40));
    }
}
