use crate::pools::EventHandle;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use telemetry::Telemetry;

/// FIFO of pooled events shared by every producer thread and the dispatch loop.
///
/// Every operation takes the single queue lock, so a push is never observed
/// half-done and the consumer sees events in push order.
#[derive(Clone)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<EventHandle>>>,
    telemetry: Telemetry,
}

impl EventQueue {
    /// Creates an empty queue reporting into `telemetry`.
    pub fn new(telemetry: Telemetry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
            telemetry,
        }
    }

    /// Appends an event.
    pub fn push(&self, event: EventHandle) {
        self.inner.lock().push_back(event);
        self.telemetry.with_stats(|s| s.events_enqueued += 1);
    }

    /// Removes the oldest event.
    pub fn pop(&self) -> Option<EventHandle> {
        self.inner.lock().pop_front()
    }

    /// Drops up to `count` of the oldest events, returning how many were dropped.
    pub fn discard(&self, count: usize) -> usize {
        let mut inner = self.inner.lock();
        let dropped = count.min(inner.len());
        inner.drain(..dropped);
        dropped
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::EventPools;

    #[test]
    fn pops_in_push_order() {
        let telemetry = Telemetry::new();
        let pools = EventPools::new(4).unwrap();
        let queue = EventQueue::new(telemetry.clone());
        for line in ["a", "b", "c"] {
            queue.push(pools.command_line(line).unwrap());
        }
        let order: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|e| e.text().unwrap_or_default().to_owned())
            .collect();
        assert_eq!(order, ["a", "b", "c"]);
        assert_eq!(telemetry.snapshot().events_enqueued, 3);
    }

    #[test]
    fn discard_releases_slots() {
        let pools = EventPools::new(2).unwrap();
        let queue = EventQueue::new(Telemetry::new());
        queue.push(pools.command_line("a").unwrap());
        queue.push(pools.command_line("b").unwrap());
        assert_eq!(queue.discard(5), 2);
        assert!(queue.is_empty());
        assert_eq!(pools.pool(crate::Category::CommandLine).available(), 2);
    }
}
