use crate::command::{Completed, ExecCx, QueuedCommand};
use crate::queue::CommandQueue;
use crossbeam_channel::{bounded, select, tick, Sender};
use event::WatchList;
use render_abi::Renderer;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use telemetry::{Notices, StdoutNotices, Telemetry};

/// Cadence of the execution thread.
pub const DEFAULT_EXEC_INTERVAL: Duration = Duration::from_millis(2);

/// Follow-up batches allowed within one tick before the rest waits for the next.
const MAX_BATCHES_PER_TICK: usize = 16;

/// Runs queued commands against the collaborators.
#[derive(Clone)]
pub struct Executor {
    queue: CommandQueue,
    renderer: Arc<dyn Renderer>,
    completed: Sender<Completed>,
    watches: WatchList,
    notices: Notices,
    telemetry: Telemetry,
    interval: Duration,
}

impl Executor {
    /// Creates an executor publishing reports into `completed`.
    pub fn new(
        queue: CommandQueue,
        renderer: Arc<dyn Renderer>,
        completed: Sender<Completed>,
    ) -> Self {
        Self {
            queue,
            renderer,
            completed,
            watches: WatchList::new(),
            notices: Arc::new(StdoutNotices),
            telemetry: Telemetry::new(),
            interval: DEFAULT_EXEC_INTERVAL,
        }
    }

    pub fn with_watches(mut self, watches: WatchList) -> Self {
        self.watches = watches;
        self
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Runs everything pending, including follow-ups queued along the way.
    ///
    /// Returns the number of commands run.
    pub fn run_pass(&self) -> usize {
        let mut ran = 0;
        for _ in 0..MAX_BATCHES_PER_TICK {
            let mut batch = self.queue.take_batch();
            if batch.is_empty() {
                break;
            }
            while let Some(command) = batch.pop() {
                self.run_one(command);
                ran += 1;
            }
        }
        ran
    }

    fn run_one(&self, queued: QueuedCommand) {
        let QueuedCommand {
            origin,
            mut command,
        } = queued;
        let mut cx = ExecCx {
            renderer: self.renderer.as_ref(),
            watches: &self.watches,
            notices: self.notices.as_ref(),
            telemetry: &self.telemetry,
            queue: &self.queue,
            completed: &self.completed,
            origin,
        };
        match command.execute(&mut cx) {
            Ok(()) => {
                tracing::debug!(command = command.name(), "command executed");
                self.telemetry.with_stats(|s| s.commands_executed += 1);
                command.on_success(&mut cx);
            }
            Err(err) => {
                tracing::warn!(command = command.name(), error = %err, "command failed");
                self.telemetry.with_stats(|s| s.commands_failed += 1);
                self.notices
                    .notice(&format!("{} failed: {err}", command.name()));
            }
        }
    }

    /// Moves the executor onto its own thread, ticking every interval.
    pub fn spawn(self) -> io::Result<ExecutorHandle> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let thread = thread::Builder::new()
            .name("command-exec".into())
            .spawn(move || {
                tracing::info!(interval = ?self.interval, "execution thread started");
                let ticker = tick(self.interval);
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            self.run_pass();
                        }
                        recv(stop_rx) -> _ => {
                            self.run_pass();
                            break;
                        }
                    }
                }
                tracing::info!("execution thread stopped");
            })?;
        Ok(ExecutorHandle {
            stop: stop_tx,
            thread: Some(thread),
        })
    }
}

/// Owner of a running execution thread; stopping drains what is queued first.
pub struct ExecutorHandle {
    stop: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl ExecutorHandle {
    /// Stops the thread after a final pass and waits for it.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        let _ = self.stop.try_send(());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("execution thread panicked");
            }
        }
    }
}

impl Drop for ExecutorHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
