use event::{Category, EventHandle, EventPools, EventQueue};
use telemetry::Telemetry;

/// What every producer loop needs to publish an event.
#[derive(Clone)]
pub struct Producer {
    /// Pools events are drawn from.
    pub pools: EventPools,
    /// Queue the dispatch loop drains.
    pub queue: EventQueue,
    /// Receives drop counts.
    pub telemetry: Telemetry,
}

impl Producer {
    /// Bundles the shared pieces.
    pub fn new(pools: EventPools, queue: EventQueue, telemetry: Telemetry) -> Self {
        Self {
            pools,
            queue,
            telemetry,
        }
    }

    /// Queues an allocated event, or counts the drop when its pool was exhausted.
    pub fn emit(&self, event: Option<EventHandle>, category: Category) -> bool {
        match event {
            Some(event) => {
                self.queue.push(event);
                true
            }
            None => {
                self.telemetry.with_stats(|s| s.events_dropped += 1);
                tracing::warn!(%category, "event pool exhausted; event dropped");
                false
            }
        }
    }

    /// Queues an abort.
    pub fn abort(&self) -> bool {
        self.emit(self.pools.empty(Category::Abort), Category::Abort)
    }
}
