use super::parse::{all, num, tokens, usage};
use crate::{branch_options, BranchOption, OptionMap, OptionMask, ReportLog, State, StateCx, StateId, StateKind};
use command::kinds;
use command::Report;
use event::{Category, Event};
use pool::SlotPool;
use render_abi::RenderLayerDesc;
use std::path::Path;

branch_options! {
    /// Options of [`RenderManager`].
    pub enum RenderOp {
        OpenWindow => "open_window",
        PrepareRenderFrames => "prepare_render_frames",
        ShaderManager => "shader_manager",
        DescriptorManager => "descriptor_manager",
        RenderPassManager => "render_pass_manager",
        PipelineManager => "pipeline_manager",
        CreateRenderLayer => "create_render_layer",
        RecordRenderCommand => "record_render_command",
        Render => "render",
        SaveSwapImage => "save_swap_image",
        PrintReports => "print_reports",
    }
}

/// Child ids of [`RenderManager`].
#[derive(Clone, Copy, Debug)]
pub struct RenderChildren {
    /// Brief `open_window`.
    pub open_window: StateId,
    /// Brief `prepare_render_frames`.
    pub prepare_frames: StateId,
    /// Branch.
    pub shader_manager: StateId,
    /// Branch.
    pub descriptor_manager: StateId,
    /// Branch.
    pub render_pass_manager: StateId,
    /// Branch.
    pub pipeline_manager: StateId,
    /// Leaf `create_render_layer`.
    pub render_layer: StateId,
    /// Leaf `record_render_command`.
    pub record: StateId,
    /// Leaf `render`.
    pub render: StateId,
    /// Leaf `save_swap_image`.
    pub save: StateId,
}

impl RenderChildren {
    pub(crate) fn all(&self) -> [StateId; 10] {
        [
            self.open_window,
            self.prepare_frames,
            self.shader_manager,
            self.descriptor_manager,
            self.render_pass_manager,
            self.pipeline_manager,
            self.render_layer,
            self.record,
            self.render,
            self.save,
        ]
    }
}

/// Latest pointer state in normalized device coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Pointer {
    x: f32,
    y: f32,
    pressed: bool,
    dirty: bool,
}

/// Window, frames and the render layers and commands drawn into them.
///
/// Sits between the director and the per-resource managers and routes their
/// reports to whichever sibling consumes them. While the window is open and
/// frames are prepared, pointer input is written to uniform slot 0.
pub struct RenderManager {
    children: RenderChildren,
    reports: ReportLog,
    bind_ubo: SlotPool<kinds::BindUboData>,
    window: Option<(u32, u32)>,
    frames_prepared: bool,
    has_layers: bool,
    pointer: Pointer,
}

impl RenderManager {
    /// Branch over `children`; pointer updates draw from `bind_ubo`.
    pub fn new(children: RenderChildren, bind_ubo: SlotPool<kinds::BindUboData>) -> Self {
        Self {
            children,
            reports: ReportLog::default(),
            bind_ubo,
            window: None,
            frames_prepared: false,
            has_layers: false,
            pointer: Pointer::default(),
        }
    }

    fn track_pointer(&mut self, event: &Event) -> bool {
        let (Some((width, height)), true) = (self.window, self.frames_prepared) else {
            return false;
        };
        let Some((x, y)) = event.position() else {
            return false;
        };
        self.pointer.x = f32::from(x) / width.max(1) as f32 * 2.0 - 1.0;
        self.pointer.y = f32::from(y) / height.max(1) as f32 * 2.0 - 1.0;
        match event.category() {
            Category::MousePress => self.pointer.pressed = true,
            Category::MouseRelease => self.pointer.pressed = false,
            _ => {}
        }
        self.pointer.dirty = true;
        true
    }
}

impl State for RenderManager {
    fn name(&self) -> &'static str {
        "render_manager"
    }

    fn kind(&self) -> StateKind {
        StateKind::Branch
    }

    fn options(&self) -> (OptionMap, OptionMask) {
        let active = OptionMask::of(&[
            RenderOp::OpenWindow,
            RenderOp::ShaderManager,
            RenderOp::DescriptorManager,
            RenderOp::RenderPassManager,
            RenderOp::PipelineManager,
            RenderOp::PrintReports,
        ]);
        (RenderOp::map(), active)
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        if matches!(
            event.category(),
            Category::Motion | Category::MousePress | Category::MouseRelease
        ) {
            if self.track_pointer(event) {
                event.set_handled();
            }
            return;
        }
        let Some((op, rest)) = cx.extract::<RenderOp>(event) else {
            return;
        };
        event.set_handled();
        let c = &self.children;
        let child = match op {
            RenderOp::OpenWindow => c.open_window,
            RenderOp::PrepareRenderFrames => c.prepare_frames,
            RenderOp::ShaderManager => c.shader_manager,
            RenderOp::DescriptorManager => c.descriptor_manager,
            RenderOp::RenderPassManager => c.render_pass_manager,
            RenderOp::PipelineManager => c.pipeline_manager,
            RenderOp::CreateRenderLayer => c.render_layer,
            RenderOp::RecordRenderCommand => c.record,
            RenderOp::Render => c.render,
            RenderOp::SaveSwapImage => c.save,
            RenderOp::PrintReports => {
                self.reports.print(cx, self.name());
                return;
            }
        };
        cx.push_seeded(child, &rest);
    }

    fn receive_report(&mut self, report: Report, cx: &mut StateCx<'_>) {
        let c = self.children;
        match &report {
            Report::Window(window) => {
                self.window = Some((window.width, window.height));
                cx.deactivate(RenderOp::OpenWindow);
                cx.activate(RenderOp::PrepareRenderFrames);
                self.reports.push(report);
            }
            Report::RenderFrames => {
                self.frames_prepared = true;
                cx.deactivate(RenderOp::PrepareRenderFrames);
                cx.activate(RenderOp::SaveSwapImage);
                if self.has_layers {
                    cx.activate(RenderOp::RecordRenderCommand);
                }
                self.reports.push(report);
            }
            Report::Shader(_) => {
                cx.forward(c.pipeline_manager, report.clone());
                cx.forward_to_parent(report);
            }
            Report::DescriptorSetLayout(_) | Report::PipelineLayout(_) => {
                cx.forward(c.pipeline_manager, report);
            }
            Report::RenderPass(pass) => {
                cx.add_word(c.render_layer, &pass.name);
                cx.forward(c.pipeline_manager, report);
            }
            Report::Attachment(attachment) => {
                cx.add_word(c.render_layer, &attachment.desc.name);
                cx.forward(c.descriptor_manager, report);
            }
            Report::GraphicsPipeline(pipeline) => {
                cx.add_word(c.render_layer, &pipeline.desc.name);
                cx.activate(RenderOp::CreateRenderLayer);
                self.reports.push(report);
            }
            Report::RenderLayer(layer) => {
                cx.add_word(c.record, &layer.index.to_string());
                self.has_layers = true;
                if self.frames_prepared {
                    cx.activate(RenderOp::RecordRenderCommand);
                }
                self.reports.push(report);
            }
            Report::RenderCommand(command) => {
                cx.add_word(c.render, &command.index.to_string());
                cx.activate(RenderOp::Render);
                self.reports.push(report);
            }
            Report::FrameDescriptorSets(_) => {
                self.reports.push(report);
            }
        }
    }

    fn end_frame(&mut self, cx: &mut StateCx<'_>) {
        if !self.pointer.dirty {
            return;
        }
        let p = self.pointer;
        let values = [p.x, p.y, if p.pressed { 1.0 } else { 0.0 }];
        // A write still in flight keeps the update pending for the next frame.
        if let Some(command) = self.bind_ubo.request(|c| c.set(0, &values)) {
            cx.submit(Some(command), "bind_ubo_data");
            self.pointer.dirty = false;
        }
    }
}

/// Opens the window on entry.
pub(crate) struct OpenWindow {
    width: u32,
    height: u32,
    pool: SlotPool<kinds::OpenWindow>,
}

impl OpenWindow {
    pub(crate) fn new(width: u32, height: u32, pool: SlotPool<kinds::OpenWindow>) -> Self {
        Self {
            width,
            height,
            pool,
        }
    }
}

impl State for OpenWindow {
    fn name(&self) -> &'static str {
        "open_window"
    }

    fn kind(&self) -> StateKind {
        StateKind::Brief
    }

    fn handle_event(&mut self, _event: &mut Event, _cx: &mut StateCx<'_>) {}

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        let (width, height) = (self.width, self.height);
        cx.submit(self.pool.request(|c| c.set(width, height)), "open_window");
    }
}

/// Prepares per-frame resources on entry.
pub(crate) struct PrepareFrames {
    pool: SlotPool<kinds::PrepareRenderFrames>,
}

impl PrepareFrames {
    pub(crate) fn new(pool: SlotPool<kinds::PrepareRenderFrames>) -> Self {
        Self { pool }
    }
}

impl State for PrepareFrames {
    fn name(&self) -> &'static str {
        "prepare_render_frames"
    }

    fn kind(&self) -> StateKind {
        StateKind::Brief
    }

    fn handle_event(&mut self, _event: &mut Event, _cx: &mut StateCx<'_>) {}

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        cx.submit(self.pool.request(|_| {}), "prepare_render_frames");
    }
}

/// `<attachment|swap> <render pass> <pipeline>`
pub(crate) struct CreateRenderLayer {
    pool: SlotPool<kinds::CreateRenderLayer>,
}

impl CreateRenderLayer {
    pub(crate) fn new(pool: SlotPool<kinds::CreateRenderLayer>) -> Self {
        Self { pool }
    }
}

impl State for CreateRenderLayer {
    fn name(&self) -> &'static str {
        "create_render_layer"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        usage(cx, "render layer: <attachment|swap> <render pass> <pipeline>");
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let [attachment, render_pass, pipeline] = tokens.as_slice() else {
            return;
        };
        let desc = RenderLayerDesc {
            attachment: attachment.clone(),
            render_pass: render_pass.clone(),
            pipeline: pipeline.clone(),
        };
        cx.submit(self.pool.request(|c| c.set(desc)), "create_render_layer");
        cx.finish(event);
    }
}

/// `<command index> <layer index>...`
pub(crate) struct RecordRenderCommand {
    pool: SlotPool<kinds::RecordRenderCommand>,
}

impl RecordRenderCommand {
    pub(crate) fn new(pool: SlotPool<kinds::RecordRenderCommand>) -> Self {
        Self { pool }
    }
}

impl State for RecordRenderCommand {
    fn name(&self) -> &'static str {
        "record_render_command"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        usage(cx, "record: <command index> <layer index>...");
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let Some((index, layers)) = tokens.split_first() else {
            return;
        };
        let (Some(index), Some(layers)) = (num::<u32>(index), all::<u32>(layers)) else {
            return;
        };
        if layers.is_empty() {
            return;
        }
        cx.submit(
            self.pool.request(|c| c.set(index, &layers)),
            "record_render_command",
        );
        cx.finish(event);
    }
}

/// `<command index>` draws it every frame; `off` stops drawing.
pub(crate) struct Render;

impl State for Render {
    fn name(&self) -> &'static str {
        "render"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        usage(cx, "render: <command index> | off");
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let [choice] = tokens.as_slice() else {
            return;
        };
        if choice == "off" {
            cx.frame().clear_draw();
            cx.notice("rendering stopped");
        } else {
            let Some(index) = num::<u32>(choice) else {
                return;
            };
            let recorded = index.to_string();
            if !cx.words().contains(&recorded) {
                cx.notice(&format!("render command {index} was never recorded"));
                return;
            }
            cx.frame().select_draw(index);
            cx.notice(&format!("rendering command {index}"));
        }
        cx.finish(event);
    }
}

/// `<path>`
pub(crate) struct SaveSwapImage {
    pool: SlotPool<kinds::SaveSwapImage>,
}

impl SaveSwapImage {
    pub(crate) fn new(pool: SlotPool<kinds::SaveSwapImage>) -> Self {
        Self { pool }
    }
}

impl State for SaveSwapImage {
    fn name(&self) -> &'static str {
        "save_swap_image"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn prompt(&self) -> Option<&'static str> {
        Some("save swap image: <path>")
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let [path] = tokens.as_slice() else {
            return;
        };
        cx.submit(
            self.pool.request(|c| c.set(Path::new(path))),
            "save_swap_image",
        );
        cx.finish(event);
    }
}
