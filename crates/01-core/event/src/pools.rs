use crate::event::{Category, Event, Key, MouseButton};
use pool::{PoolResult, Pooled, SlotPool};
use std::path::Path;

/// Pooled event travelling through the queue.
pub type EventHandle = Pooled<Event>;

/// Slots per category when no capacity is configured.
pub const DEFAULT_EVENT_CAPACITY: usize = 32;

/// One slot pool per [`Category`].
///
/// Producers draw from the pool matching the category they emit; the handle
/// returns to that pool when the dispatch loop drops it.
#[derive(Clone, Debug)]
pub struct EventPools {
    pools: Vec<SlotPool<Event>>,
}

impl EventPools {
    /// Builds a pool of `capacity` slots for each category.
    pub fn new(capacity: usize) -> PoolResult<Self> {
        let pools = Category::ALL
            .iter()
            .map(|category| SlotPool::new(category.label(), capacity))
            .collect::<PoolResult<Vec<_>>>()?;
        Ok(Self { pools })
    }

    /// Pool backing `category`.
    pub fn pool(&self, category: Category) -> &SlotPool<Event> {
        &self.pools[usize::from(category.as_byte())]
    }

    /// Allocates a console line.
    pub fn command_line(&self, text: &str) -> Option<EventHandle> {
        self.pool(Category::CommandLine)
            .request(|event| event.set_command_line(text))
    }

    /// Allocates a payload-free event (abort, enter, leave).
    pub fn empty(&self, category: Category) -> Option<EventHandle> {
        self.pool(category).request(|event| event.set_empty(category))
    }

    /// Allocates a motion, press or release event.
    pub fn pointer(
        &self,
        category: Category,
        x: i16,
        y: i16,
        button: Option<MouseButton>,
    ) -> Option<EventHandle> {
        self.pool(category)
            .request(|event| event.set_pointer(category, x, y, button))
    }

    /// Allocates a key event.
    pub fn key(&self, category: Category, x: i16, y: i16, key: Key) -> Option<EventHandle> {
        self.pool(category)
            .request(|event| event.set_key(category, x, y, key))
    }

    /// Allocates a file-changed notification.
    pub fn file_changed(&self, path: &Path) -> Option<EventHandle> {
        self.pool(Category::FileChanged)
            .request(|event| event.set_file_changed(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_draw_from_separate_pools() {
        let pools = EventPools::new(1).unwrap();
        let line = pools.command_line("open_window").unwrap();
        assert!(pools.command_line("again").is_none());
        let abort = pools.empty(Category::Abort).unwrap();
        assert_eq!(line.category(), Category::CommandLine);
        assert_eq!(abort.category(), Category::Abort);
    }

    #[test]
    fn released_line_slot_is_reused_with_new_text() {
        let pools = EventPools::new(1).unwrap();
        drop(pools.command_line("first line").unwrap());
        let second = pools.command_line("second").unwrap();
        assert_eq!(second.tokens().collect::<Vec<_>>(), ["second"]);
    }
}
