use crate::error::CommandResult;
use crate::queue::CommandQueue;
use crate::report::Report;
use crossbeam_channel::Sender;
use event::WatchList;
use pool::{Pooled, Recycle};
use render_abi::Renderer;
use std::path::PathBuf;
use telemetry::{NoticeSink, Telemetry};

/// Identifies the state that queued a command, so its report finds its way back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Origin(pub u32);

/// Report published by a successful command, tagged with its origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completed {
    pub origin: Origin,
    pub report: Report,
}

/// Unit of work run by the execution thread.
pub trait Command: Send + 'static {
    /// Stable name for logs and notices.
    fn name(&self) -> &'static str;

    /// Performs the side effect.
    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()>;

    /// Runs synchronously after a successful `execute`, before the next command.
    fn on_success(&mut self, _cx: &mut ExecCx<'_>) {}
}

impl<T: Command + Recycle> Command for Pooled<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        (**self).execute(cx)
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        (**self).on_success(cx)
    }
}

/// A command waiting in the [`CommandQueue`].
pub struct QueuedCommand {
    pub(crate) origin: Option<Origin>,
    pub(crate) command: Box<dyn Command>,
}

impl QueuedCommand {
    pub fn new(origin: Option<Origin>, command: impl Command) -> Self {
        Self {
            origin,
            command: Box::new(command),
        }
    }

    pub fn name(&self) -> &'static str {
        self.command.name()
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }
}

impl std::fmt::Debug for QueuedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedCommand")
            .field("name", &self.name())
            .field("origin", &self.origin)
            .finish()
    }
}

/// What a running command may touch.
pub struct ExecCx<'a> {
    pub(crate) renderer: &'a dyn Renderer,
    pub(crate) watches: &'a WatchList,
    pub(crate) notices: &'a dyn NoticeSink,
    pub(crate) telemetry: &'a Telemetry,
    pub(crate) queue: &'a CommandQueue,
    pub(crate) completed: &'a Sender<Completed>,
    pub(crate) origin: Option<Origin>,
}

impl<'a> ExecCx<'a> {
    pub fn renderer(&self) -> &'a dyn Renderer {
        self.renderer
    }

    /// Registers `path` with the file watcher.
    pub fn watch(&self, path: impl Into<PathBuf>) {
        self.watches.watch(path);
    }

    /// Writes an operator-visible line.
    pub fn notice(&self, line: &str) {
        self.notices.notice(line);
    }

    /// Sends `report` back to the state that queued this command.
    ///
    /// Commands queued without an origin have nobody to tell; their reports
    /// are dropped.
    pub fn publish(&self, report: Report) {
        let Some(origin) = self.origin else {
            tracing::debug!(kind = report.kind().label(), "report without origin dropped");
            return;
        };
        if self.completed.send(Completed { origin, report }).is_err() {
            tracing::debug!("report channel closed");
        }
    }

    /// Queues a follow-up command under the same origin.
    ///
    /// Follow-ups run later in the same execution tick. An exhausted pool
    /// (`None`) is announced and counted instead of queued.
    pub fn follow_up<T: Command + Recycle>(&self, command: Option<Pooled<T>>, label: &str) {
        match command {
            Some(command) => self.queue.push(QueuedCommand::new(self.origin, command)),
            None => {
                self.telemetry.with_stats(|s| s.commands_dropped += 1);
                self.notices
                    .notice(&format!("too many in-flight {label} commands; dropped"));
            }
        }
    }
}
