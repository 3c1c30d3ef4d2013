use crate::support::{offers, wait_until};
use app::{Application, Inputs};
use event::Category;
use headless::{ChannelWindow, HeadlessRenderer};
use render_abi::{NativeEvent, NativeKind};
use std::sync::Arc;
use std::thread;

/// Pointer motion over the window reaches the first frame uniform buffer.
#[test]
fn pointer_motion_updates_uniforms() {
    let renderer = Arc::new(HeadlessRenderer::new());
    let app = Application::builder()
        .renderer(renderer.clone())
        .notices(Arc::new(telemetry::CapturedNotices::new()))
        .build()
        .unwrap();
    let producer = app.producer().clone();
    let vocabulary = app.vocabulary().clone();
    let shutdown = app.shutdown().clone();
    let telemetry = app.telemetry().clone();
    let (window, feed) = ChannelWindow::new();
    let inputs = Inputs {
        console: None,
        window: Some(Arc::new(window)),
    };
    let running = thread::spawn(move || app.run(inputs));

    let type_line = |line: &str| {
        assert!(producer.emit(producer.pools.command_line(line), Category::CommandLine));
    };
    type_line("render_manager open_window");
    wait_until("window", || offers(&vocabulary, "prepare_render_frames"));
    type_line("prepare_render_frames");
    wait_until("frames", || offers(&vocabulary, "save_swap_image"));
    type_line("descriptor_manager create_descriptor_set_layout dsl0 ubo");
    wait_until("layout", || offers(&vocabulary, "create_frame_descriptor_sets"));
    type_line("create_frame_descriptor_sets dsl0");
    wait_until("frame sets", || offers(&vocabulary, "init_frame_ubos"));
    type_line("init_frame_ubos 12 0");
    wait_until("uniform buffer", || {
        !renderer.ledger().frame_uniform_buffers.is_empty()
    });

    assert!(feed.send(NativeEvent::new(NativeKind::Motion, 400, 150, 0)));
    wait_until("uniform data", || renderer.ledger().ubo_data.contains_key(&0));
    assert_eq!(renderer.ledger().ubo_data[&0], [0.0, -0.5, 0.0]);

    // Escape is routed like any key, then ends native input.
    assert!(feed.send(NativeEvent::new(NativeKind::KeyPress, 0, 0, 9)));
    wait_until("escape dispatched", || telemetry.snapshot().events_unhandled >= 1);

    shutdown.request();
    let stats = running.join().unwrap().unwrap();
    assert_eq!(stats.commands_failed, 0);
    assert_eq!(stats.events_dropped, 0);
}
