use crate::{branch_options, BranchOption, OptionMap, OptionMask, State, StateCx, StateId, StateKind};
use command::kinds;
use command::{CommandPools, Report};
use event::{Category, Event};
use pool::SlotPool;
use render_abi::ShaderStage;
use std::collections::HashMap;
use std::path::PathBuf;

branch_options! {
    /// Options of [`Director`].
    pub enum DirectorOp {
        RenderManager => "render_manager",
        ListResources => "list_resources",
    }
}

/// Root of the tree. Never popped.
///
/// Besides its two options it owns shader hot reload: compiled shaders report
/// their source path up to here, and a change to one of those files queues a
/// recompile whose success rebuilds the pipelines using the shader.
pub struct Director {
    render_manager: StateId,
    list: SlotPool<kinds::ListResources>,
    compile: SlotPool<kinds::CompileShader>,
    recreate: SlotPool<kinds::RecreatePipelines>,
    sources: HashMap<PathBuf, (String, ShaderStage)>,
}

impl Director {
    /// Root over `render_manager`, drawing commands from `pools`.
    pub fn new(render_manager: StateId, pools: &CommandPools) -> Self {
        Self {
            render_manager,
            list: pools.list_resources.clone(),
            compile: pools.compile_shader.clone(),
            recreate: pools.recreate_pipelines.clone(),
            sources: HashMap::new(),
        }
    }

    fn reload(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let Some(path) = event.path().map(PathBuf::from) else {
            return;
        };
        let Some((name, stage)) = self.sources.get(&path) else {
            tracing::debug!(path = %path.display(), "change to unknown file ignored");
            return;
        };
        tracing::info!(shader = %name, "source changed; recompiling");
        let recreate = &self.recreate;
        cx.submit(
            self.compile
                .request(|c| c.set_reload(*stage, name, &path, recreate)),
            "compile_shader",
        );
        event.set_handled();
    }
}

impl State for Director {
    fn name(&self) -> &'static str {
        "director"
    }

    fn kind(&self) -> StateKind {
        StateKind::Branch
    }

    fn options(&self) -> (OptionMap, OptionMask) {
        let active = OptionMask::of(&[DirectorOp::RenderManager, DirectorOp::ListResources]);
        (DirectorOp::map(), active)
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        if event.category() == Category::FileChanged {
            self.reload(event, cx);
            return;
        }
        let Some((op, rest)) = cx.extract::<DirectorOp>(event) else {
            return;
        };
        event.set_handled();
        match op {
            DirectorOp::RenderManager => cx.push_seeded(self.render_manager, &rest),
            DirectorOp::ListResources => {
                cx.submit(self.list.request(|_| {}), "list_resources");
            }
        }
    }

    fn receive_report(&mut self, report: Report, _cx: &mut StateCx<'_>) {
        if let Report::Shader(shader) = report {
            if let Some(source) = shader.source {
                tracing::debug!(shader = %shader.name, source = %source.display(), "watching shader source");
                self.sources.insert(source, (shader.name, shader.stage));
            }
        }
    }
}
