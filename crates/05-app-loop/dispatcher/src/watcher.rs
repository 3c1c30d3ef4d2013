use crate::producer::Producer;
use crate::shutdown::{spawn_loop, LoopHandle, Shutdown};
use event::{Category, WatchList};
use std::io;
use std::thread;
use std::time::Duration;

/// Poll period when none is configured.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_millis(250);

/// Polls watched files and reports modifications as events.
pub struct WatchLoop {
    watches: WatchList,
    producer: Producer,
    shutdown: Shutdown,
    interval: Duration,
}

impl WatchLoop {
    /// Loop over `watches`, polling every [`DEFAULT_WATCH_INTERVAL`].
    pub fn new(watches: WatchList, producer: Producer, shutdown: Shutdown) -> Self {
        Self {
            watches,
            producer,
            shutdown,
            interval: DEFAULT_WATCH_INTERVAL,
        }
    }

    /// Overrides the poll period.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Polls once; returns how many change events were queued.
    pub fn step(&self) -> usize {
        self.watches
            .poll()
            .into_iter()
            .filter(|path| {
                tracing::debug!(path = %path.display(), "watched file changed");
                self.producer
                    .emit(self.producer.pools.file_changed(path), Category::FileChanged)
            })
            .count()
    }

    /// Polls until shutdown.
    pub fn run(self) {
        while !self.shutdown.is_requested() {
            self.step();
            thread::sleep(self.interval);
        }
    }

    /// Runs the loop on the `fs-watch` thread.
    pub fn spawn(self) -> io::Result<LoopHandle> {
        spawn_loop("fs-watch", move || self.run())
    }
}
