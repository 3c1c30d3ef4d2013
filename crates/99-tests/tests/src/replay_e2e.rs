use crate::support::SESSION;
use app::{AppConfig, Application};
use dispatcher::ReplayConfig;
use event::log::{EventLogWriter, LoggedEvent};
use headless::HeadlessRenderer;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use telemetry::{CapturedNotices, ControlStats};

fn write_session(dir: &Path) -> PathBuf {
    let path = dir.join("session.log");
    let mut writer = EventLogWriter::append(&path).unwrap();
    for line in SESSION {
        let event = match *line {
            "q" => LoggedEvent::Abort,
            text => LoggedEvent::CommandLine(text.into()),
        };
        writer.write(&event).unwrap();
    }
    path
}

/// Replays one record per tick, running commands between ticks, until idle.
fn replay(replay: ReplayConfig) -> (Arc<HeadlessRenderer>, ControlStats) {
    let renderer = Arc::new(HeadlessRenderer::new());
    let mut app = Application::builder()
        .renderer(renderer.clone())
        .notices(Arc::new(CapturedNotices::new()))
        .config(AppConfig {
            replay: Some(replay),
            ..AppConfig::default()
        })
        .build()
        .unwrap();
    for _ in 0..(SESSION.len() * 4) {
        app.tick();
        app.run_commands();
        if app.is_idle() {
            break;
        }
    }
    assert!(app.is_idle());
    let stats = app.telemetry().snapshot();
    (renderer, stats)
}

/// Paced replay rebuilds the whole session and keeps drawing.
#[test]
fn paced_replay_reproduces_session() {
    let dir = tempfile::tempdir().unwrap();
    let (renderer, stats) = replay(ReplayConfig {
        path: write_session(dir.path()),
        skip: 0,
        max_reads: 0,
        per_tick: 1,
    });
    let ledger = renderer.ledger();
    assert_eq!(
        renderer.calls().iter().take(2).cloned().collect::<Vec<_>>(),
        ["open_window 800x600", "prepare_render_frames"]
    );
    assert!(ledger.pipelines.contains_key("tri"));
    assert!(ledger.frames_rendered >= 1);
    assert_eq!(stats.events_replayed, SESSION.len() as u64);
    assert_eq!(stats.events_unhandled, 0);
    assert_eq!(stats.commands_failed, 0);
}

/// Skipping the first record leaves `open_window` with no state to take it.
#[test]
fn skipped_prefix_changes_the_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let (renderer, stats) = replay(ReplayConfig {
        path: write_session(dir.path()),
        skip: 1,
        max_reads: 2,
        per_tick: 1,
    });
    assert_eq!(renderer.ledger().window, None);
    assert_eq!(stats.events_replayed, 2);
    assert_eq!(stats.events_unhandled, 2);
}
