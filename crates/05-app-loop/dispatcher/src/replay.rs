use crate::producer::Producer;
use event::log::{EventLogReader, LogResult, LoggedEvent};
use std::collections::VecDeque;
use std::io::Read;
use std::path::PathBuf;

/// Where and how fast to replay a recorded session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Event log to read.
    pub path: PathBuf,
    /// Records discarded before the first injected one.
    pub skip: usize,
    /// Cap on records read after skipping; 0 reads them all.
    pub max_reads: usize,
    /// Cap on records injected per frame tick; 0 injects everything at once.
    pub per_tick: usize,
}

/// Recorded events waiting to be injected into the event queue.
pub struct Replay {
    pending: VecDeque<LoggedEvent>,
    per_tick: usize,
}

impl Replay {
    /// Loads the log named by `config`.
    pub fn open(config: &ReplayConfig) -> LogResult<Self> {
        let reader = EventLogReader::open(&config.path)?;
        let replay = Self::read(reader, config)?;
        tracing::info!(
            path = %config.path.display(),
            events = replay.remaining(),
            "replay loaded"
        );
        Ok(replay)
    }

    /// Loads from any reader, honouring the skip and read caps of `config`.
    pub fn read<R: Read>(mut reader: EventLogReader<R>, config: &ReplayConfig) -> LogResult<Self> {
        let skipped = reader.skip(config.skip)?;
        if skipped < config.skip {
            tracing::warn!(requested = config.skip, skipped, "replay log shorter than skip");
        }
        let mut pending = VecDeque::new();
        while config.max_reads == 0 || pending.len() < config.max_reads {
            match reader.next_event()? {
                Some(event) => pending.push_back(event),
                None => break,
            }
        }
        Ok(Self::from_events(pending, config.per_tick))
    }

    /// Replays `events` directly.
    pub fn from_events(events: impl IntoIterator<Item = LoggedEvent>, per_tick: usize) -> Self {
        Self {
            pending: events.into_iter().collect(),
            per_tick,
        }
    }

    /// Queues this tick's share of events; returns how many were queued.
    ///
    /// An event whose pool is exhausted stays at the front for the next tick.
    pub fn inject(&mut self, producer: &Producer) -> usize {
        let budget = match self.per_tick {
            0 => usize::MAX,
            n => n,
        };
        let mut injected = 0;
        while injected < budget {
            let Some(next) = self.pending.front() else {
                break;
            };
            let Some(event) = next.materialize(&producer.pools) else {
                tracing::debug!(category = %next.category(), "replay waits for a free event slot");
                break;
            };
            producer.queue.push(event);
            self.pending.pop_front();
            injected += 1;
        }
        if injected > 0 {
            producer
                .telemetry
                .with_stats(|s| s.events_replayed += injected as u64);
        }
        injected
    }

    /// Events not yet injected.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// True once everything was injected.
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}
