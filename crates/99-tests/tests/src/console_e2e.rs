use crate::support::{Operator, SESSION};
use app::{AppConfig, Application, Inputs, RecordConfig};
use dispatcher::{RecordTiming, SharedVocabulary};
use event::log::{EventLogReader, LoggedEvent};
use headless::HeadlessRenderer;
use std::sync::Arc;
use telemetry::CapturedNotices;

/// A threaded session typed at the console ends with frames being rendered.
#[test]
fn console_session_renders_frames() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("session.log");
    let renderer = Arc::new(HeadlessRenderer::new());
    let notices = Arc::new(CapturedNotices::new());
    let vocabulary = SharedVocabulary::new();
    let app = Application::builder()
        .renderer(renderer.clone())
        .notices(notices.clone())
        .vocabulary(vocabulary.clone())
        .config(AppConfig {
            frame_interval: std::time::Duration::from_millis(2),
            record: Some(RecordConfig {
                path: log.clone(),
                timing: RecordTiming::BeforeDispatch,
            }),
            ..AppConfig::default()
        })
        .build()
        .unwrap();

    let inputs = Inputs {
        console: Some(Box::new(Operator::new(SESSION, vocabulary))),
        window: None,
    };
    let stats = app.run(inputs).unwrap();

    let ledger = renderer.ledger();
    assert_eq!(ledger.window, Some((800, 600)));
    assert!(ledger.pipelines.contains_key("tri"));
    assert_eq!(ledger.render_commands.get(&0), Some(&vec![0]));
    assert!(ledger.frames_rendered >= 1);
    assert_eq!(stats.commands_failed, 0);
    assert_eq!(stats.events_unhandled, 0);
    assert!(notices.contains("rendering command 0"));

    // Every typed line and abort was recorded, plus the abort closing input sends.
    let recorded = EventLogReader::open(&log).unwrap().read_all().unwrap();
    assert_eq!(recorded.len(), SESSION.len() + 1);
    assert_eq!(recorded.last(), Some(&LoggedEvent::Abort));
    assert_eq!(
        recorded[0],
        LoggedEvent::CommandLine("render_manager".into())
    );
    assert_eq!(stats.events_recorded, recorded.len() as u64);
}
