use crate::command::QueuedCommand;
use parking_lot::Mutex;
use std::sync::Arc;
use telemetry::Telemetry;

/// Pending commands shared by the dispatch and execution threads.
///
/// Pushes stack onto the back; [`take_batch`](Self::take_batch) removes the
/// whole stack under the lock and reverses it once, so popping the batch
/// yields commands in the order they were pushed.
#[derive(Clone)]
pub struct CommandQueue {
    inner: Arc<Mutex<Vec<QueuedCommand>>>,
    telemetry: Telemetry,
}

impl CommandQueue {
    pub fn new(telemetry: Telemetry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
            telemetry,
        }
    }

    pub fn push(&self, command: QueuedCommand) {
        tracing::trace!(command = command.name(), "command queued");
        self.inner.lock().push(command);
        self.telemetry.with_stats(|s| s.commands_queued += 1);
    }

    /// Takes every pending command; pop from the end for FIFO order.
    pub fn take_batch(&self) -> Vec<QueuedCommand> {
        let mut batch = std::mem::take(&mut *self.inner.lock());
        batch.reverse();
        batch
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Names of the pending commands, oldest first.
    pub fn pending_names(&self) -> Vec<&'static str> {
        self.inner.lock().iter().map(QueuedCommand::name).collect()
    }
}
