use crate::application::DEFAULT_FRAME_INTERVAL;
use command::{PoolCapacities, DEFAULT_EXEC_INTERVAL};
use dispatcher::{RecordTiming, ReplayConfig, DEFAULT_WATCH_INTERVAL};
use event::DEFAULT_EVENT_CAPACITY;
use std::path::PathBuf;
use std::time::Duration;

/// Where to record the session and when.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordConfig {
    /// Log appended to.
    pub path: PathBuf,
    /// Record before or after dispatch.
    pub timing: RecordTiming,
}

/// Everything the application needs besides its collaborators.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Window width requested by `open_window`.
    pub width: u32,
    /// Window height requested by `open_window`.
    pub height: u32,
    /// Sleep between frame ticks.
    pub frame_interval: Duration,
    /// Cadence of the execution thread.
    pub exec_interval: Duration,
    /// Poll period of the file watcher.
    pub watch_interval: Duration,
    /// Slots per event category.
    pub event_capacity: usize,
    /// Per-kind command pool sizes.
    pub pools: PoolCapacities,
    /// Recorded session to inject, if any.
    pub replay: Option<ReplayConfig>,
    /// Session recording, if any.
    pub record: Option<RecordConfig>,
    /// Print a notice for input no state recognized.
    pub announce_unrecognized: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            exec_interval: DEFAULT_EXEC_INTERVAL,
            watch_interval: DEFAULT_WATCH_INTERVAL,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            pools: PoolCapacities::default(),
            replay: None,
            record: None,
            announce_unrecognized: false,
        }
    }
}
