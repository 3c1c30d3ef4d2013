use event::log::{EventLogWriter, LogResult};
use event::Event;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use telemetry::Telemetry;

/// When the dispatcher writes an event relative to dispatching it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordTiming {
    /// Record on dequeue.
    #[default]
    BeforeDispatch,
    /// Record once the state machine has seen the event.
    AfterDispatch,
}

/// Appends console lines and aborts to an event log.
pub struct Recorder {
    writer: EventLogWriter<Box<dyn Write + Send>>,
    timing: RecordTiming,
}

impl Recorder {
    /// Appends to the log at `path`, creating it if needed.
    pub fn create(path: &Path, timing: RecordTiming) -> LogResult<Self> {
        let file = File::options().create(true).append(true).open(path)?;
        tracing::info!(path = %path.display(), ?timing, "recording events");
        Ok(Self::new(BufWriter::new(file), timing))
    }

    /// Records into any sink.
    pub fn new(out: impl Write + Send + 'static, timing: RecordTiming) -> Self {
        Self {
            writer: EventLogWriter::new(Box::new(out)),
            timing,
        }
    }

    /// Configured timing.
    pub fn timing(&self) -> RecordTiming {
        self.timing
    }

    /// Writes `event` if it is recordable. A failed write is logged, not fatal.
    pub fn record(&mut self, event: &Event, telemetry: &Telemetry) {
        match self.writer.record(event) {
            Ok(true) => telemetry.with_stats(|s| s.events_recorded += 1),
            Ok(false) => {}
            Err(err) => tracing::warn!(error = %err, "failed to record event"),
        }
    }
}
