use crate::config::AppConfig;
use anyhow::{anyhow, Context, Result};
use command::kinds::RenderFrame;
use command::{CommandPools, CommandQueue, Completed, Executor, QueuedCommand};
use crossbeam_channel::{unbounded, Receiver};
use dispatcher::{
    ConsoleLoop, Dispatcher, LineSource, LoopHandle, NativeLoop, Producer, Recorder, Replay,
    SharedVocabulary, Shutdown, WatchLoop,
};
use event::{EventPools, EventQueue, WatchList};
use pool::SlotPool;
use render_abi::{Renderer, WindowSource};
use state::states::{self, TreeConfig};
use state::{Links, StateMachine};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use telemetry::{ControlStats, Notices, StdoutNotices, Telemetry};

/// Sleep between frame ticks when none is configured.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Interactive input attached to a running application.
#[derive(Default)]
pub struct Inputs {
    /// Operator console.
    pub console: Option<Box<dyn LineSource>>,
    /// Window whose pointer and key input is routed.
    pub window: Option<Arc<dyn WindowSource>>,
}

impl Inputs {
    fn is_interactive(&self) -> bool {
        self.console.is_some() || self.window.is_some()
    }
}

/// The assembled control plane.
///
/// Owned by the frame thread: the state machine, its reports and the
/// vocabulary are only touched from here.
pub struct Application {
    machine: StateMachine,
    dispatcher: Dispatcher,
    producer: Producer,
    replay: Option<Replay>,
    queue: CommandQueue,
    completed: Receiver<Completed>,
    executor: Option<Executor>,
    render_frame: SlotPool<RenderFrame>,
    watches: WatchList,
    vocabulary: SharedVocabulary,
    telemetry: Telemetry,
    shutdown: Shutdown,
    frame_interval: Duration,
    watch_interval: Duration,
}

impl Application {
    /// Returns a builder with defaults for everything but the renderer.
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// Runs one frame.
    ///
    /// Injects replayed events, routes completed reports, drains and
    /// dispatches input, then submits the selected render command and
    /// publishes the vocabulary if it changed.
    pub fn tick(&mut self) {
        if let Some(replay) = self.replay.as_mut() {
            replay.inject(&self.producer);
        }
        self.machine.begin_frame();
        while let Ok(done) = self.completed.try_recv() {
            self.machine.absorb(done);
        }
        self.dispatcher.drain(&mut self.machine);
        self.machine.end_frame();
        self.submit_frame();
        if let Some(words) = self.machine.take_vocabulary_change() {
            self.vocabulary.publish(words);
        }
        self.telemetry.with_stats(|s| s.frames += 1);
    }

    fn submit_frame(&self) {
        let Some(index) = self.machine.frame().draw() else {
            return;
        };
        match self.render_frame.request(|c| c.set(index)) {
            Some(frame) => self.queue.push(QueuedCommand::new(None, frame)),
            None => tracing::trace!(index, "previous frame in flight; submission skipped"),
        }
    }

    /// Runs queued commands on the calling thread; 0 once [`run`](Self::run) took the executor.
    pub fn run_commands(&self) -> usize {
        self.executor.as_ref().map_or(0, Executor::run_pass)
    }

    /// True when nothing is left to replay, dispatch or execute.
    pub fn is_idle(&self) -> bool {
        self.replay.as_ref().map_or(true, Replay::is_finished)
            && self.producer.queue.is_empty()
            && self.queue.is_empty()
            && self.completed.is_empty()
    }

    /// Starts the worker threads and ticks until shutdown.
    ///
    /// Without interactive inputs the loop also ends once the application is
    /// idle. On the way out one tick dispatches input queued before the stop,
    /// the executor drains what is queued and a final tick routes its reports.
    /// Returns the final counters.
    pub fn run(mut self, inputs: Inputs) -> Result<ControlStats> {
        let interactive = inputs.is_interactive();
        let executor = self
            .executor
            .take()
            .ok_or_else(|| anyhow!("application already ran"))?
            .spawn()
            .context("spawning execution thread")?;
        let mut loops = vec![self.spawn_watcher()?];
        if let Some(source) = inputs.console {
            let console = ConsoleLoop::new(source, self.producer.clone(), self.shutdown.clone());
            loops.push(console.spawn().context("spawning console thread")?);
        }
        if let Some(window) = inputs.window {
            let native = NativeLoop::new(window, self.producer.clone(), self.shutdown.clone());
            loops.push(native.spawn().context("spawning native input thread")?);
        }
        tracing::info!(interactive, interval = ?self.frame_interval, "frame loop started");

        while !self.shutdown.is_requested() {
            self.tick();
            if !interactive && self.is_idle() {
                tracing::info!("replay finished and queues drained");
                break;
            }
            thread::sleep(self.frame_interval);
        }
        self.shutdown.request();
        self.tick();
        executor.shutdown();
        self.tick();
        for handle in loops {
            if handle.is_finished() {
                handle.join();
            } else {
                tracing::debug!(thread = handle.name(), "loop still blocked; detached");
            }
        }
        tracing::info!("frame loop stopped");
        Ok(self.telemetry.snapshot())
    }

    fn spawn_watcher(&self) -> Result<LoopHandle> {
        WatchLoop::new(
            self.watches.clone(),
            self.producer.clone(),
            self.shutdown.clone(),
        )
        .with_interval(self.watch_interval)
        .spawn()
        .context("spawning file watch thread")
    }

    /// The state machine.
    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Pools, queue and counters producers publish through.
    pub fn producer(&self) -> &Producer {
        &self.producer
    }

    /// Console completion words.
    pub fn vocabulary(&self) -> &SharedVocabulary {
        &self.vocabulary
    }

    /// Shared counters.
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Flag that stops every loop.
    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Files the watcher polls.
    pub fn watches(&self) -> &WatchList {
        &self.watches
    }
}

/// Builder for an [`Application`].
pub struct ApplicationBuilder {
    renderer: Option<Arc<dyn Renderer>>,
    config: AppConfig,
    notices: Notices,
    telemetry: Telemetry,
    vocabulary: SharedVocabulary,
}

impl ApplicationBuilder {
    /// Creates a builder with default config, stdout notices and fresh counters.
    pub fn new() -> Self {
        Self {
            renderer: None,
            config: AppConfig::default(),
            notices: Arc::new(StdoutNotices),
            telemetry: Telemetry::new(),
            vocabulary: SharedVocabulary::new(),
        }
    }

    /// Sets the renderer commands run against.
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Replaces the configuration.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets where operator-visible lines go.
    pub fn notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    /// Shares an existing counter sink.
    pub fn telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Shares the vocabulary a console helper completes from.
    pub fn vocabulary(mut self, vocabulary: SharedVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Builds the application, opening the replay and record logs if configured.
    pub fn build(self) -> Result<Application> {
        let renderer = self.renderer.ok_or_else(|| anyhow!("missing renderer"))?;
        let config = self.config;
        let telemetry = self.telemetry;

        let pools = CommandPools::new(&config.pools).context("building command pools")?;
        let events = EventPools::new(config.event_capacity).context("building event pools")?;
        let queue = CommandQueue::new(telemetry.clone());
        let events_queue = EventQueue::new(telemetry.clone());
        let watches = WatchList::new();
        let (tx, completed) = unbounded();
        let executor = Executor::new(queue.clone(), renderer, tx)
            .with_watches(watches.clone())
            .with_notices(self.notices.clone())
            .with_telemetry(telemetry.clone())
            .with_interval(config.exec_interval);

        let links = Links {
            queue: queue.clone(),
            notices: self.notices,
            telemetry: telemetry.clone(),
            announce_unrecognized: config.announce_unrecognized,
        };
        let tree = TreeConfig {
            width: config.width,
            height: config.height,
        };
        let machine = states::build(links, &pools, &tree);

        let mut dispatcher = Dispatcher::new(events_queue.clone(), telemetry.clone());
        if let Some(record) = &config.record {
            let recorder = Recorder::create(&record.path, record.timing)
                .with_context(|| format!("opening record log {}", record.path.display()))?;
            dispatcher = dispatcher.with_recorder(recorder);
        }
        let replay = config
            .replay
            .as_ref()
            .map(|replay| {
                Replay::open(replay)
                    .with_context(|| format!("reading replay log {}", replay.path.display()))
            })
            .transpose()?;

        Ok(Application {
            machine,
            dispatcher,
            producer: Producer::new(events, events_queue, telemetry.clone()),
            replay,
            queue,
            completed,
            executor: Some(executor),
            render_frame: pools.render_frame,
            watches,
            vocabulary: self.vocabulary,
            telemetry,
            shutdown: Shutdown::new(),
            frame_interval: config.frame_interval,
            watch_interval: config.watch_interval,
        })
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
