#![deny(missing_docs)]
//! Counters and operator-facing output shared by every control-plane thread.
//!
//! Two sinks are passed explicitly into the dispatcher, the state machine and
//! the command executor:
//! * [`Telemetry`] – cloneable handle over [`ControlStats`] counters.
//! * [`NoticeSink`] – lines meant for the operator (prompts, report dumps,
//!   drop notices), kept apart from diagnostic logging.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

mod notice;

pub use notice::{CapturedNotices, NoticeSink, Notices, StdoutNotices};

/// Monotonic counters describing control-plane throughput.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize)]
pub struct ControlStats {
    /// Events accepted into the event queue.
    pub events_enqueued: u64,
    /// Events lost because their category pool was exhausted.
    pub events_dropped: u64,
    /// Events offered to the state stack.
    pub events_dispatched: u64,
    /// Dispatched events no state claimed.
    pub events_unhandled: u64,
    /// Events appended to the event log.
    pub events_recorded: u64,
    /// Events injected from a replay log.
    pub events_replayed: u64,
    /// Commands accepted into the command queue.
    pub commands_queued: u64,
    /// Command requests refused because their pool was exhausted.
    pub commands_dropped: u64,
    /// Commands that ran to success.
    pub commands_executed: u64,
    /// Commands whose execution returned an error.
    pub commands_failed: u64,
    /// Reports delivered to a state.
    pub reports_routed: u64,
    /// Frame ticks completed by the dispatch loop.
    pub frames: u64,
}

impl ControlStats {
    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Shared handle to a [`ControlStats`] block.
#[derive(Clone, Default)]
pub struct Telemetry(Arc<Mutex<ControlStats>>);

impl Telemetry {
    /// Creates a handle over fresh counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the counters.
    pub fn with_stats<R>(&self, f: impl FnOnce(&mut ControlStats) -> R) -> R {
        let mut guard = self.0.lock();
        f(&mut guard)
    }

    /// Copies the current counters.
    pub fn snapshot(&self) -> ControlStats {
        *self.0.lock()
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Telemetry").field(&self.snapshot()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_counters() {
        let telemetry = Telemetry::new();
        let other = telemetry.clone();
        other.with_stats(|s| s.commands_queued += 2);
        telemetry.with_stats(|s| s.commands_executed += 1);
        let snap = telemetry.snapshot();
        assert_eq!(snap.commands_queued, 2);
        assert_eq!(snap.commands_executed, 1);
    }

    #[test]
    fn stats_serialize_by_field_name() {
        let telemetry = Telemetry::new();
        telemetry.with_stats(|s| s.frames = 3);
        let json = serde_json::to_value(telemetry.snapshot()).unwrap();
        assert_eq!(json["frames"], 3);
        assert_eq!(json["events_dropped"], 0);
    }
}
