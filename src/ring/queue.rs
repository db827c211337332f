//! Bounded drop-oldest queue shared by ring sinks and sources

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;

/// Element stored in the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingPayload<C> {
    /// Content inserted while the ring had room
    Payload(C),

    /// Content inserted into a full ring, with the most recently evicted
    /// value kept for diagnostics
    Overflow { lost: C, kept: C },
}

impl<C> RingPayload<C> {
    /// The content a consumer should see.
    pub fn kept(&self) -> &C {
        match self {
            RingPayload::Payload(content) => content,
            RingPayload::Overflow { kept, .. } => kept,
        }
    }

    pub fn into_kept(self) -> C {
        match self {
            RingPayload::Payload(content) => content,
            RingPayload::Overflow { kept, .. } => kept,
        }
    }

    /// The evicted content, if this element was inserted on overflow.
    pub fn lost(&self) -> Option<&C> {
        match self {
            RingPayload::Payload(_) => None,
            RingPayload::Overflow { lost, .. } => Some(lost),
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, RingPayload::Overflow { .. })
    }
}

/// Whether a push had to evict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Stored,
    Overflowed,
}

/// Fixed-capacity queue with linearizable evict-and-insert and a
/// cancel-safe async pop.
#[derive(Debug)]
pub(crate) struct RingQueue<C> {
    slots: Mutex<VecDeque<RingPayload<C>>>,
    capacity: usize,
    available: Notify,
    overflows: AtomicU64,
}

impl<C> RingQueue<C> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            available: Notify::new(),
            overflows: AtomicU64::new(0),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub(crate) fn overflow_count(&self) -> u64 {
        self.overflows.load(Ordering::Relaxed)
    }

    /// Insert `content`, evicting the oldest element when full.
    ///
    /// The capacity check, eviction and insertion happen under one lock.
    pub(crate) fn push(&self, content: C) -> PushOutcome {
        let outcome = {
            let mut slots = self.slots.lock();
            let (element, outcome) = if slots.len() >= self.capacity {
                match slots.pop_front() {
                    Some(RingPayload::Payload(old)) | Some(RingPayload::Overflow { kept: old, .. }) => {
                        (RingPayload::Overflow { lost: old, kept: content }, PushOutcome::Overflowed)
                    }
                    None => (RingPayload::Payload(content), PushOutcome::Stored),
                }
            } else {
                (RingPayload::Payload(content), PushOutcome::Stored)
            };
            slots.push_back(element);
            outcome
        };

        if outcome == PushOutcome::Overflowed {
            self.overflows.fetch_add(1, Ordering::Relaxed);
        }
        self.available.notify_one();
        outcome
    }

    pub(crate) fn try_pop(&self) -> Option<RingPayload<C>> {
        self.slots.lock().pop_front()
    }

    /// Wait for and remove the oldest element.
    ///
    /// Removal only happens in the same poll that returns it, so dropping
    /// this future never loses an element.
    pub(crate) async fn pop(&self) -> RingPayload<C> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(element) = self.try_pop() {
                return element;
            }

            notified.await;
        }
    }

    pub(crate) fn drain(&self) -> Vec<RingPayload<C>> {
        self.slots.lock().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn below_capacity_keeps_order() {
        let queue = RingQueue::new(4);
        for value in 1..=4 {
            assert_eq!(queue.push(value), PushOutcome::Stored);
        }

        let drained = queue.drain();
        assert_eq!(drained, (1..=4).map(RingPayload::Payload).collect::<Vec<_>>());
        assert_eq!(queue.overflow_count(), 0);
    }

    #[test]
    fn overflow_records_evicted_value() {
        let queue = RingQueue::new(2);
        queue.push('A');
        queue.push('B');
        assert_eq!(queue.push('C'), PushOutcome::Overflowed);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec![RingPayload::Payload('B'), RingPayload::Overflow { lost: 'A', kept: 'C' }]);
    }

    #[test]
    fn only_one_level_of_loss_history() {
        let queue = RingQueue::new(1);
        queue.push(1);
        queue.push(2);
        queue.push(3);

        // Evicting Overflow{lost: 1, kept: 2} keeps 2 as the loss, drops 1
        assert_eq!(queue.drain(), vec![RingPayload::Overflow { lost: 2, kept: 3 }]);
        assert_eq!(queue.overflow_count(), 2);
    }

    #[test]
    fn concurrent_producers_never_exceed_capacity() {
        let queue = Arc::new(RingQueue::new(8));
        let handles: Vec<_> = (0..4)
            .map(|producer| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for i in 0..1000 {
                        queue.push(producer * 1000 + i);
                        assert!(queue.len() <= 8);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(queue.len(), 8);
        assert_eq!(queue.overflow_count(), 4000 - 8);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_pop_consumes_nothing() {
        let queue = RingQueue::<u32>::new(2);

        let timed_out = tokio::time::timeout(Duration::from_millis(5), queue.pop()).await;
        assert!(timed_out.is_err());

        queue.push(7);
        assert_eq!(queue.pop().await, RingPayload::Payload(7));
    }

    #[tokio::test]
    async fn pop_wakes_on_push() {
        let queue = Arc::new(RingQueue::new(2));
        let producer = Arc::clone(&queue);
        let waiter = tokio::spawn(async move { queue.pop().await });

        tokio::task::yield_now().await;
        producer.push("late");

        assert_eq!(waiter.await.unwrap(), RingPayload::Payload("late"));
    }
}
