use headless::{ChannelWindow, HeadlessRenderer};
use render_abi::{
    Area, Binding, GraphicsPipelineDesc, NativeEvent, NativeKind, RenderError, RenderLayerDesc,
    RenderPassTarget, Renderer, ResourceKind, ShaderStage, WindowSource,
};
use std::thread;

fn pipeline(name: &str) -> GraphicsPipelineDesc {
    GraphicsPipelineDesc {
        name: name.into(),
        layout: "layout".into(),
        vertex_shader: "tri_vert".into(),
        fragment_shader: "tri_frag".into(),
        render_pass: "swap_pass".into(),
        area: Area {
            x: 0,
            y: 0,
            width: 800,
            height: 800,
        },
        is_3d: false,
    }
}

fn ready_renderer() -> HeadlessRenderer {
    let renderer = HeadlessRenderer::new();
    renderer.open_window(800, 800).unwrap();
    renderer.prepare_render_frames().unwrap();
    renderer.load_shader(ShaderStage::Vertex, "tri_vert").unwrap();
    renderer.load_shader(ShaderStage::Fragment, "tri_frag").unwrap();
    renderer
        .create_render_pass("swap_pass", &RenderPassTarget::Swapchain)
        .unwrap();
    renderer
        .create_descriptor_set_layout("dsl0", &["ubo:frag".parse::<Binding>().unwrap()])
        .unwrap();
    renderer
        .create_pipeline_layout("layout", &["dsl0".into()])
        .unwrap();
    renderer
}

/// Pipeline layouts refuse set layouts that were never created.
#[test]
fn pipeline_layout_requires_known_set_layouts() {
    let renderer = HeadlessRenderer::new();
    let err = renderer
        .create_pipeline_layout("foo", &["dsl0".into()])
        .unwrap_err();
    assert!(matches!(err, RenderError::Missing { kind: "descriptor set layout", .. }));
    assert!(renderer.calls().is_empty());
}

/// A full pipeline build is recorded call by call and rendering counts frames.
#[test]
fn full_build_then_render() {
    let renderer = ready_renderer();
    renderer.create_graphics_pipeline(&pipeline("tri")).unwrap();
    let layer = renderer
        .create_render_layer(&RenderLayerDesc {
            attachment: "swap".into(),
            render_pass: "swap_pass".into(),
            pipeline: "tri".into(),
        })
        .unwrap();
    renderer.record_render_commands(0, &[layer]).unwrap();
    renderer.render_frame(0).unwrap();
    renderer.render_frame(0).unwrap();

    let ledger = renderer.ledger();
    assert_eq!(ledger.frames_rendered, 2);
    assert_eq!(renderer.list(ResourceKind::Pipelines), ["tri"]);
    assert_eq!(
        renderer.calls().last().map(String::as_str),
        Some("record_render_commands 0 [0]")
    );
}

/// Recreating pipelines bumps only those that use the shader.
#[test]
fn recreate_touches_dependent_pipelines() {
    let renderer = ready_renderer();
    renderer.create_graphics_pipeline(&pipeline("a")).unwrap();
    renderer.load_shader(ShaderStage::Fragment, "other").unwrap();
    let mut b = pipeline("b");
    b.fragment_shader = "other".into();
    renderer.create_graphics_pipeline(&b).unwrap();

    assert_eq!(renderer.recreate_graphics_pipelines("tri_frag").unwrap(), ["a"]);
    let ledger = renderer.ledger();
    assert_eq!(ledger.pipelines["a"].generation, 1);
    assert_eq!(ledger.pipelines["b"].generation, 0);
}

/// Compiling reads the source file and replaces a module of the same name.
#[test]
fn compile_reads_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tri.frag");
    std::fs::write(&path, "void main() {}").unwrap();

    let renderer = HeadlessRenderer::new();
    renderer
        .compile_shader(ShaderStage::Fragment, "tri_frag", &path)
        .unwrap();
    renderer
        .compile_shader(ShaderStage::Fragment, "tri_frag", &path)
        .unwrap();
    assert_eq!(renderer.list(ResourceKind::Shaders), ["tri_frag"]);

    let missing = dir.path().join("nope.frag");
    assert!(matches!(
        renderer.compile_shader(ShaderStage::Fragment, "x", &missing),
        Err(RenderError::Io(_))
    ));
}

/// The channel window blocks for events and reports closure when the feed drops.
#[test]
fn channel_window_closes_with_feed() {
    let (window, feed) = ChannelWindow::new();
    let producer = thread::spawn(move || {
        feed.send(NativeEvent::new(NativeKind::Motion, 3, 4, 0));
    });
    assert_eq!(
        window.wait_for_event(),
        Some(NativeEvent::new(NativeKind::Motion, 3, 4, 0))
    );
    producer.join().expect("feed thread panicked");
    assert_eq!(window.wait_for_event(), None);
}
