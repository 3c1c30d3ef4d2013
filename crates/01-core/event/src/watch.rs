use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

struct Watched {
    path: PathBuf,
    modified: Option<SystemTime>,
}

/// Paths whose modification times are polled for changes.
///
/// Commands register paths from the execution thread; the watch loop polls
/// from its own thread.
#[derive(Clone, Default)]
pub struct WatchList {
    entries: Arc<Mutex<Vec<Watched>>>,
}

impl WatchList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts watching `path`. Returns false if it was already watched.
    pub fn watch(&self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let mut entries = self.entries.lock();
        if entries.iter().any(|w| w.path == path) {
            return false;
        }
        let modified = modified_at(&path);
        tracing::debug!(path = %path.display(), "watching file");
        entries.push(Watched { path, modified });
        true
    }

    /// Watched paths, in registration order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.lock().iter().map(|w| w.path.clone()).collect()
    }

    /// Returns the paths whose modification time moved since the last poll.
    ///
    /// A path that cannot be read is skipped and keeps its last known time.
    pub fn poll(&self) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for entry in self.entries.lock().iter_mut() {
            let Some(now) = modified_at(&entry.path) else {
                continue;
            };
            if entry.modified != Some(now) {
                entry.modified = Some(now);
                changed.push(entry.path.clone());
            }
        }
        changed
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
