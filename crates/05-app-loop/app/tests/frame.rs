use app::{AppConfig, Application, Inputs, RecordConfig};
use dispatcher::{RecordTiming, ReplayConfig};
use event::log::{EventLogReader, LoggedEvent};
use event::Category;
use headless::HeadlessRenderer;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use telemetry::CapturedNotices;

/// Lines taking an empty renderer to a recorded render command.
const SESSION: &[&str] = &[
    "render_manager open_window",
    "prepare_render_frames",
    "shader_manager load_vert_shaders tri_vert",
    "load_frag_shaders tri_frag",
    "q",
    "render_pass_manager create_swapchain_render_pass main",
    "q",
    "descriptor_manager create_descriptor_set_layout dsl0 ubo:vert",
    "q",
    "pipeline_manager create_pipeline_layout pl",
    "create_graphics_pipeline tri pl tri_vert tri_frag main 640 480",
    "q",
    "create_render_layer swap main tri",
    "record_render_command 0 0",
];

struct Rig {
    app: Application,
    renderer: Arc<HeadlessRenderer>,
    notices: Arc<CapturedNotices>,
}

fn rig(config: AppConfig) -> Rig {
    let renderer = Arc::new(HeadlessRenderer::new());
    let notices = Arc::new(CapturedNotices::new());
    let app = Application::builder()
        .renderer(renderer.clone())
        .notices(notices.clone())
        .config(config)
        .build()
        .unwrap();
    Rig {
        app,
        renderer,
        notices,
    }
}

impl Rig {
    /// Queues a console line or abort as the console loop would.
    fn type_line(&self, line: &str) {
        let producer = self.app.producer();
        if line == "q" {
            producer.abort();
        } else {
            producer.emit(producer.pools.command_line(line), Category::CommandLine);
        }
    }

    /// One line, one tick, then whatever it queued runs.
    fn enter(&mut self, line: &str) {
        self.type_line(line);
        self.app.tick();
        self.app.run_commands();
    }

    fn settle(&mut self) {
        self.app.tick();
        self.app.run_commands();
        self.app.tick();
    }
}

fn recorded(path: &Path) -> Vec<LoggedEvent> {
    EventLogReader::open(path).unwrap().read_all().unwrap()
}

/// The builder refuses to assemble without a renderer.
#[test]
fn builder_requires_renderer() {
    let err = Application::builder().build().err().unwrap();
    assert_eq!(err.to_string(), "missing renderer");
}

/// A missing replay log is reported with its path.
#[test]
fn builder_reports_missing_replay_log() {
    let config = AppConfig {
        replay: Some(ReplayConfig {
            path: "/nonexistent/session.log".into(),
            ..ReplayConfig::default()
        }),
        ..AppConfig::default()
    };
    let err = Application::builder()
        .renderer(Arc::new(HeadlessRenderer::new()))
        .config(config)
        .build()
        .err()
        .unwrap();
    assert!(err.to_string().contains("/nonexistent/session.log"));
}

/// The first tick publishes the root vocabulary and counts a frame.
#[test]
fn first_tick_publishes_vocabulary() {
    let mut rig = rig(AppConfig::default());
    assert!(rig.app.vocabulary().snapshot().is_empty());
    rig.app.tick();
    assert_eq!(
        *rig.app.vocabulary().snapshot(),
        ["render_manager", "list_resources"]
    );
    assert_eq!(rig.app.telemetry().snapshot().frames, 1);
}

/// Selecting a render command submits one frame per tick, skipping while one is in flight.
#[test]
fn selected_command_renders_each_frame() {
    let mut rig = rig(AppConfig {
        width: 640,
        height: 480,
        ..AppConfig::default()
    });
    for line in SESSION {
        rig.enter(line);
    }
    rig.settle();
    assert_eq!(rig.renderer.ledger().render_commands.len(), 1);

    // The tick that selects the command already submits its first frame.
    rig.enter("render 0");
    assert!(rig.notices.contains("rendering command 0"));
    assert_eq!(rig.renderer.ledger().frames_rendered, 1);

    // While a frame is still queued the next tick skips submission.
    rig.app.tick();
    rig.app.tick();
    assert_eq!(rig.app.run_commands(), 1);
    assert_eq!(rig.renderer.ledger().frames_rendered, 2);

    rig.enter("render off");
    rig.settle();
    let rendered = rig.renderer.ledger().frames_rendered;
    rig.settle();
    assert_eq!(rig.renderer.ledger().frames_rendered, rendered);
    assert_eq!(rig.app.telemetry().snapshot().commands_failed, 0);
}

/// An index no render command was recorded under is refused, so frames never fail on it.
#[test]
fn unrecorded_render_index_is_refused() {
    let mut rig = rig(AppConfig {
        width: 640,
        height: 480,
        ..AppConfig::default()
    });
    for line in SESSION {
        rig.enter(line);
    }
    rig.settle();
    let failed = rig.app.telemetry().snapshot().commands_failed;

    rig.enter("render 7");
    assert!(rig.notices.contains("render command 7 was never recorded"));
    assert_eq!(rig.app.machine().frame().draw(), None);
    for _ in 0..5 {
        rig.settle();
    }
    assert_eq!(rig.renderer.ledger().frames_rendered, 0);
    assert_eq!(rig.app.telemetry().snapshot().commands_failed, failed);

    // The leaf is still waiting for a valid index.
    rig.enter("0");
    assert_eq!(rig.app.machine().frame().draw(), Some(0));
    assert_eq!(rig.app.telemetry().snapshot().commands_failed, failed);
}

/// A recorded session replays into the same stack, minus what was skipped.
#[test]
fn record_then_replay_with_skip() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("session.log");

    let mut recording = rig(AppConfig {
        record: Some(RecordConfig {
            path: log.clone(),
            timing: RecordTiming::BeforeDispatch,
        }),
        ..AppConfig::default()
    });
    for line in ["render_manager", "shader_manager", "q", "descriptor_manager"] {
        recording.enter(line);
    }
    assert_eq!(
        recording.app.machine().stack_names(),
        ["director", "render_manager", "descriptor_manager"]
    );
    drop(recording);
    assert_eq!(
        recorded(&log),
        [
            LoggedEvent::CommandLine("render_manager".into()),
            LoggedEvent::CommandLine("shader_manager".into()),
            LoggedEvent::Abort,
            LoggedEvent::CommandLine("descriptor_manager".into()),
        ]
    );

    let mut replaying = rig(AppConfig {
        replay: Some(ReplayConfig {
            path: log,
            skip: 0,
            max_reads: 0,
            per_tick: 1,
        }),
        ..AppConfig::default()
    });
    for _ in 0..4 {
        replaying.app.tick();
    }
    assert!(replaying.app.is_idle());
    assert_eq!(
        replaying.app.machine().stack_names(),
        ["director", "render_manager", "descriptor_manager"]
    );
    assert_eq!(replaying.app.telemetry().snapshot().events_replayed, 4);
}

/// Without a console or window, `run` ends once the replay is drained.
#[test]
fn run_ends_after_replay_without_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("session.log");
    {
        let mut writer = event::log::EventLogWriter::append(&log).unwrap();
        for line in ["render_manager open_window", "list_resources"] {
            writer
                .write(&LoggedEvent::CommandLine(line.into()))
                .unwrap();
        }
    }
    let rig = rig(AppConfig {
        replay: Some(ReplayConfig {
            path: log,
            ..ReplayConfig::default()
        }),
        frame_interval: std::time::Duration::from_millis(1),
        ..AppConfig::default()
    });
    let stats = rig.app.run(Inputs::default()).unwrap();
    assert_eq!(rig.renderer.ledger().window, Some((800, 600)));
    assert_eq!(stats.events_replayed, 2);
    assert!(stats.frames >= 2);
}
