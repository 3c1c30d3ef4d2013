use event::log::{EventLogReader, EventLogWriter, LoggedEvent};
use event::{Category, EventPools};

/// Appending from two writer sessions keeps every record, in order.
#[test]
fn append_sessions_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.log");

    {
        let mut writer = EventLogWriter::append(&path).unwrap();
        writer
            .write(&LoggedEvent::CommandLine("render_manager".into()))
            .unwrap();
    }
    {
        let mut writer = EventLogWriter::append(&path).unwrap();
        writer.write(&LoggedEvent::Abort).unwrap();
        writer
            .write(&LoggedEvent::CommandLine("shader_manager".into()))
            .unwrap();
    }

    let events = EventLogReader::open(&path).unwrap().read_all().unwrap();
    assert_eq!(
        events,
        [
            LoggedEvent::CommandLine("render_manager".into()),
            LoggedEvent::Abort,
            LoggedEvent::CommandLine("shader_manager".into()),
        ]
    );
}

/// A logged event materializes into a live pooled event of the same category.
#[test]
fn materialize_uses_category_pool() {
    let pools = EventPools::new(1).unwrap();
    let line = LoggedEvent::CommandLine("open_window now".into())
        .materialize(&pools)
        .unwrap();
    assert_eq!(line.category(), Category::CommandLine);
    assert_eq!(line.tokens().collect::<Vec<_>>(), ["open_window", "now"]);
    assert!(LoggedEvent::CommandLine("x".into())
        .materialize(&pools)
        .is_none());
}
