use super::parse::{num, tokens, usage};
use crate::{branch_options, BranchOption, OptionMap, OptionMask, ReportLog, State, StateCx, StateId, StateKind};
use command::kinds;
use command::Report;
use event::Event;
use pool::SlotPool;
use render_abi::{Area, GraphicsPipelineDesc};

branch_options! {
    /// Options of [`PipelineManager`].
    pub enum PipelineOp {
        CreatePipelineLayout => "create_pipeline_layout",
        CreateGraphicsPipeline => "create_graphics_pipeline",
        PrintReports => "print_reports",
    }
}

/// Leaf ids owned by [`PipelineManager`].
#[derive(Clone, Copy, Debug)]
pub struct PipelineLeaves {
    /// `create_pipeline_layout`
    pub layout: StateId,
    /// `create_graphics_pipeline`
    pub graphics: StateId,
}

impl PipelineLeaves {
    pub(crate) fn all(&self) -> [StateId; 2] {
        [self.layout, self.graphics]
    }
}

/// Pipeline layouts and graphics pipelines.
///
/// Learns descriptor set layouts, shaders and render passes from reports the
/// render manager routes here, and offers them to its leaves.
pub struct PipelineManager {
    leaves: PipelineLeaves,
    reports: ReportLog,
}

impl PipelineManager {
    /// Branch over `leaves`.
    pub fn new(leaves: PipelineLeaves) -> Self {
        Self {
            leaves,
            reports: ReportLog::default(),
        }
    }
}

impl State for PipelineManager {
    fn name(&self) -> &'static str {
        "pipeline_manager"
    }

    fn kind(&self) -> StateKind {
        StateKind::Branch
    }

    fn options(&self) -> (OptionMap, OptionMask) {
        (PipelineOp::map(), OptionMask::of(&[PipelineOp::PrintReports]))
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let Some((op, rest)) = cx.extract::<PipelineOp>(event) else {
            return;
        };
        event.set_handled();
        let leaf = match op {
            PipelineOp::CreatePipelineLayout => self.leaves.layout,
            PipelineOp::CreateGraphicsPipeline => self.leaves.graphics,
            PipelineOp::PrintReports => {
                self.reports.print(cx, self.name());
                return;
            }
        };
        cx.push_seeded(leaf, &rest);
    }

    fn receive_report(&mut self, report: Report, cx: &mut StateCx<'_>) {
        match &report {
            Report::DescriptorSetLayout(layout) => {
                cx.add_word(self.leaves.layout, &layout.name);
                cx.activate(PipelineOp::CreatePipelineLayout);
            }
            Report::Shader(shader) => cx.add_word(self.leaves.graphics, &shader.name),
            Report::RenderPass(pass) => cx.add_word(self.leaves.graphics, &pass.name),
            Report::PipelineLayout(layout) => {
                cx.add_word(self.leaves.graphics, &layout.name);
                cx.activate(PipelineOp::CreateGraphicsPipeline);
                self.reports.push(report);
            }
            Report::GraphicsPipeline(_) => {
                self.reports.push(report.clone());
                cx.forward_to_parent(report);
            }
            _ => cx.forward_to_parent(report),
        }
    }
}

/// `<name> [set layout...]`; no layouts means every known one.
pub(crate) struct CreateLayout {
    pool: SlotPool<kinds::CreatePipelineLayout>,
}

impl CreateLayout {
    pub(crate) fn new(pool: SlotPool<kinds::CreatePipelineLayout>) -> Self {
        Self { pool }
    }
}

impl State for CreateLayout {
    fn name(&self) -> &'static str {
        "create_pipeline_layout"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        usage(cx, "pipeline layout: <name> [set layout...]");
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let Some((name, layouts)) = tokens.split_first() else {
            return;
        };
        let layouts = if layouts.is_empty() {
            cx.words().to_vec()
        } else {
            layouts.to_vec()
        };
        cx.submit(
            self.pool.request(|c| c.set(name, layouts)),
            "create_pipeline_layout",
        );
        cx.finish(event);
    }
}

/// `<name> <layout> <vert> <frag> <render pass> <width> <height> [x y] [3d]`
pub(crate) struct CreateGraphics {
    pool: SlotPool<kinds::CreateGraphicsPipeline>,
}

impl CreateGraphics {
    pub(crate) fn new(pool: SlotPool<kinds::CreateGraphicsPipeline>) -> Self {
        Self { pool }
    }
}

fn pipeline_desc(tokens: &[String]) -> Option<GraphicsPipelineDesc> {
    let [name, layout, vert, frag, pass, width, height, rest @ ..] = tokens else {
        return None;
    };
    let (rest, is_3d) = match rest {
        [head @ .., last] if last == "3d" => (head, true),
        _ => (rest, false),
    };
    let (x, y) = match rest {
        [] => (0, 0),
        [x, y] => (num(x)?, num(y)?),
        _ => return None,
    };
    Some(GraphicsPipelineDesc {
        name: name.clone(),
        layout: layout.clone(),
        vertex_shader: vert.clone(),
        fragment_shader: frag.clone(),
        render_pass: pass.clone(),
        area: Area {
            x,
            y,
            width: num(width)?,
            height: num(height)?,
        },
        is_3d,
    })
}

impl State for CreateGraphics {
    fn name(&self) -> &'static str {
        "create_graphics_pipeline"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        usage(
            cx,
            "graphics pipeline: <name> <layout> <vert> <frag> <render pass> <width> <height> [x y] [3d]",
        );
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let Some(desc) = pipeline_desc(&tokens(event)) else {
            return;
        };
        cx.submit(
            self.pool.request(|c| c.set(desc)),
            "create_graphics_pipeline",
        );
        cx.finish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn pipeline_desc_optional_tail() {
        let plain = pipeline_desc(&line("tri pl tv tf swap 640 480")).unwrap();
        assert_eq!(plain.area, Area { x: 0, y: 0, width: 640, height: 480 });
        assert!(!plain.is_3d);

        let full = pipeline_desc(&line("tri pl tv tf swap 640 480 10 20 3d")).unwrap();
        assert_eq!((full.area.x, full.area.y), (10, 20));
        assert!(full.is_3d);

        assert!(pipeline_desc(&line("tri pl tv tf swap 640")).is_none());
        assert!(pipeline_desc(&line("tri pl tv tf swap 640 480 10")).is_none());
    }
}
