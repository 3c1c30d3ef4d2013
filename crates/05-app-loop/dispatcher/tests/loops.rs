use command::{CommandPools, CommandQueue, PoolCapacities};
use dispatcher::{
    ConsoleLoop, Dispatcher, LoopStep, NativeLoop, Producer, RecordTiming, Recorder, Replay,
    ReplayConfig, ScriptedLines, Shutdown, WatchLoop,
};
use event::log::{EventLogReader, EventLogWriter, LoggedEvent};
use event::{Category, EventPools, EventQueue, Key, MouseButton, WatchList};
use headless::ChannelWindow;
use pretty_assertions::assert_eq;
use render_abi::{NativeEvent, NativeKind};
use state::states::{self, TreeConfig};
use state::{Links, StateMachine};
use std::sync::Arc;
use telemetry::{CapturedNotices, Telemetry};

fn producer(capacity: usize) -> Producer {
    let telemetry = Telemetry::new();
    Producer::new(
        EventPools::new(capacity).unwrap(),
        EventQueue::new(telemetry.clone()),
        telemetry,
    )
}

fn drain(queue: &EventQueue) -> Vec<(Category, Option<String>)> {
    std::iter::from_fn(|| queue.pop())
        .map(|e| (e.category(), e.text().map(str::to_owned)))
        .collect()
}

fn machine(telemetry: &Telemetry) -> StateMachine {
    let links = Links {
        queue: CommandQueue::new(telemetry.clone()),
        notices: Arc::new(CapturedNotices::new()),
        telemetry: telemetry.clone(),
        announce_unrecognized: false,
    };
    let pools = CommandPools::new(&PoolCapacities::default()).unwrap();
    states::build(links, &pools, &TreeConfig::default())
}

/// `q` aborts, blanks vanish, end of input aborts and requests shutdown.
#[test]
fn console_script_becomes_events() {
    let producer = producer(8);
    let shutdown = Shutdown::new();
    let script = ScriptedLines::new(["render_manager", "", "open q", "list_resources"]);
    ConsoleLoop::new(script, producer.clone(), shutdown.clone()).run();

    assert!(shutdown.is_requested());
    assert_eq!(
        drain(&producer.queue),
        [
            (Category::CommandLine, Some("render_manager".to_owned())),
            (Category::Abort, None),
            (Category::CommandLine, Some("list_resources".to_owned())),
            (Category::Abort, None),
        ]
    );
}

/// `quit` stops reading; later lines are never consumed.
#[test]
fn quit_stops_the_console() {
    let producer = producer(8);
    let shutdown = Shutdown::new();
    let mut console = ConsoleLoop::new(
        ScriptedLines::new(["quit", "never read"]),
        producer.clone(),
        shutdown.clone(),
    );
    assert_eq!(console.step().unwrap(), LoopStep::Stop);
    assert!(shutdown.is_requested());
    assert_eq!(drain(&producer.queue), [(Category::Abort, None)]);
}

/// Native records become typed events; Escape is queued and then ends the loop.
#[test]
fn native_loop_translates_until_escape() {
    let producer = producer(4);
    let (window, feed) = ChannelWindow::new();
    let mut native = NativeLoop::new(Arc::new(window), producer.clone(), Shutdown::new());

    feed.send(NativeEvent::new(NativeKind::Motion, 5, 6, 0));
    feed.send(NativeEvent::new(NativeKind::ButtonPress, 5, 6, 3));
    feed.send(NativeEvent::new(NativeKind::Other(12), 0, 0, 0));
    feed.send(NativeEvent::new(NativeKind::KeyPress, 0, 0, 9));
    let steps: Vec<LoopStep> = (0..4).map(|_| native.step()).collect();
    assert_eq!(steps.last(), Some(&LoopStep::Stop));

    let motion = producer.queue.pop().unwrap();
    assert_eq!((motion.category(), motion.position()), (Category::Motion, Some((5, 6))));
    let press = producer.queue.pop().unwrap();
    assert_eq!(press.button(), Some(MouseButton::Right));
    let key = producer.queue.pop().unwrap();
    assert_eq!(key.key(), Some(Key::ESCAPE));
    assert!(producer.queue.is_empty());

    // A closed window ends the loop at once.
    drop(feed);
    assert_eq!(native.step(), LoopStep::Stop);
}

/// Events beyond a category's pool capacity are dropped and counted.
#[test]
fn exhausted_event_pool_drops() {
    let producer = producer(1);
    let (window, feed) = ChannelWindow::new();
    let mut native = NativeLoop::new(Arc::new(window), producer.clone(), Shutdown::new());
    for x in 0..3 {
        feed.send(NativeEvent::new(NativeKind::Motion, x, 0, 0));
        native.step();
    }
    assert_eq!(producer.queue.len(), 1);
    assert_eq!(producer.telemetry.snapshot().events_dropped, 2);
}

/// A touched watched file is reported once.
#[test]
fn watch_loop_reports_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tri.vert");
    std::fs::write(&path, "a").unwrap();
    let watches = WatchList::new();
    watches.watch(&path);
    let producer = producer(4);
    let watcher = WatchLoop::new(watches, producer.clone(), Shutdown::new());
    assert_eq!(watcher.step(), 0);

    let file = std::fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(std::time::SystemTime::now() + std::time::Duration::from_secs(5))
        .unwrap();
    assert_eq!(watcher.step(), 1);
    assert_eq!(producer.queue.pop().unwrap().path(), Some(path.as_path()));
    assert_eq!(watcher.step(), 0);
}

fn write_log(path: &std::path::Path, events: &[LoggedEvent]) {
    let mut writer = EventLogWriter::append(path).unwrap();
    for event in events {
        writer.write(event).unwrap();
    }
}

/// Skip drops the first records, reads caps the rest, per-tick paces injection.
#[test]
fn replay_skips_caps_and_paces() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.log");
    let lines: Vec<LoggedEvent> = ["a", "b", "c", "d", "e", "f"]
        .into_iter()
        .map(|t| LoggedEvent::CommandLine(t.into()))
        .collect();
    write_log(&path, &lines);

    let config = ReplayConfig {
        path,
        skip: 1,
        max_reads: 4,
        per_tick: 3,
    };
    let mut replay = Replay::open(&config).unwrap();
    assert_eq!(replay.remaining(), 4);

    let producer = producer(8);
    assert_eq!(replay.inject(&producer), 3);
    assert_eq!(replay.inject(&producer), 1);
    assert!(replay.is_finished());
    let texts: Vec<String> = drain(&producer.queue)
        .into_iter()
        .filter_map(|(_, text)| text)
        .collect();
    assert_eq!(texts, ["b", "c", "d", "e"]);
    assert_eq!(producer.telemetry.snapshot().events_replayed, 4);
}

/// A full event pool holds replay back instead of losing records.
#[test]
fn replay_waits_for_free_slots() {
    let producer = producer(1);
    let mut replay = Replay::from_events(
        [LoggedEvent::CommandLine("a".into()), LoggedEvent::CommandLine("b".into())],
        0,
    );
    assert_eq!(replay.inject(&producer), 1);
    assert_eq!(replay.remaining(), 1);
    drain(&producer.queue);
    assert_eq!(replay.inject(&producer), 1);
    assert!(replay.is_finished());
}

/// Draining dispatches into the tree and records only console lines and aborts.
#[test]
fn dispatcher_records_what_it_drains() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rec.log");
    let telemetry = Telemetry::new();
    let pools = EventPools::new(4).unwrap();
    let queue = EventQueue::new(telemetry.clone());
    let mut machine = machine(&telemetry);
    let mut dispatcher = Dispatcher::new(queue.clone(), telemetry.clone())
        .with_recorder(Recorder::create(&path, RecordTiming::AfterDispatch).unwrap());

    queue.push(pools.command_line("render_manager").unwrap());
    queue.push(pools.pointer(Category::Motion, 1, 1, None).unwrap());
    queue.push(pools.empty(Category::Abort).unwrap());
    assert_eq!(dispatcher.drain(&mut machine), 3);
    assert!(queue.is_empty());
    assert_eq!(machine.stack_names(), ["director"]);
    drop(dispatcher);

    let recorded = EventLogReader::open(&path).unwrap().read_all().unwrap();
    assert_eq!(
        recorded,
        [LoggedEvent::CommandLine("render_manager".into()), LoggedEvent::Abort]
    );
    let stats = telemetry.snapshot();
    assert_eq!((stats.events_recorded, stats.events_dispatched), (2, 3));
}
