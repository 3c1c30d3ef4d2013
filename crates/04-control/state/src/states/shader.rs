use super::parse::{num, tokens, usage};
use crate::{branch_options, BranchOption, OptionMap, OptionMask, ReportLog, State, StateCx, StateId, StateKind};
use command::kinds;
use command::Report;
use event::Event;
use pool::SlotPool;
use render_abi::{ShaderStage, SpecConstants};
use std::path::Path;

branch_options! {
    /// Options of [`ShaderManager`].
    pub enum ShaderOp {
        LoadFragShaders => "load_frag_shaders",
        LoadVertShaders => "load_vert_shaders",
        CompileShader => "compile_shader",
        SetSpec => "set_spec",
        PrintReports => "print_reports",
    }
}

/// Leaf ids owned by [`ShaderManager`].
#[derive(Clone, Copy, Debug)]
pub struct ShaderLeaves {
    /// `load_frag_shaders`
    pub load_frag: StateId,
    /// `load_vert_shaders`
    pub load_vert: StateId,
    /// `compile_shader`
    pub compile: StateId,
    /// `set_spec`
    pub set_spec: StateId,
}

impl ShaderLeaves {
    pub(crate) fn all(&self) -> [StateId; 4] {
        [self.load_frag, self.load_vert, self.compile, self.set_spec]
    }
}

/// Loads precompiled modules, compiles sources and sets specialization constants.
pub struct ShaderManager {
    leaves: ShaderLeaves,
    reports: ReportLog,
}

impl ShaderManager {
    /// Branch over `leaves`.
    pub fn new(leaves: ShaderLeaves) -> Self {
        Self {
            leaves,
            reports: ReportLog::default(),
        }
    }
}

impl State for ShaderManager {
    fn name(&self) -> &'static str {
        "shader_manager"
    }

    fn kind(&self) -> StateKind {
        StateKind::Branch
    }

    fn options(&self) -> (OptionMap, OptionMask) {
        let active = OptionMask::of(&[
            ShaderOp::LoadFragShaders,
            ShaderOp::LoadVertShaders,
            ShaderOp::CompileShader,
            ShaderOp::PrintReports,
        ]);
        (ShaderOp::map(), active)
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let Some((op, rest)) = cx.extract::<ShaderOp>(event) else {
            return;
        };
        event.set_handled();
        let leaf = match op {
            ShaderOp::LoadFragShaders => self.leaves.load_frag,
            ShaderOp::LoadVertShaders => self.leaves.load_vert,
            ShaderOp::CompileShader => self.leaves.compile,
            ShaderOp::SetSpec => self.leaves.set_spec,
            ShaderOp::PrintReports => {
                self.reports.print(cx, self.name());
                return;
            }
        };
        cx.push_seeded(leaf, &rest);
    }

    fn receive_report(&mut self, report: Report, cx: &mut StateCx<'_>) {
        if let Report::Shader(shader) = &report {
            cx.add_word(self.leaves.set_spec, &shader.name);
            cx.activate(ShaderOp::SetSpec);
            self.reports.push(report.clone());
        }
        cx.forward_to_parent(report);
    }
}

/// `<name>...`: one load command per name.
pub(crate) struct LoadShaders {
    stage: ShaderStage,
    pool: SlotPool<kinds::LoadShader>,
}

impl LoadShaders {
    pub(crate) fn new(stage: ShaderStage, pool: SlotPool<kinds::LoadShader>) -> Self {
        Self { stage, pool }
    }
}

impl State for LoadShaders {
    fn name(&self) -> &'static str {
        match self.stage {
            ShaderStage::Fragment => "load_frag_shaders",
            ShaderStage::Vertex => "load_vert_shaders",
        }
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn prompt(&self) -> Option<&'static str> {
        Some(match self.stage {
            ShaderStage::Fragment => "fragment shaders: <name>...",
            ShaderStage::Vertex => "vertex shaders: <name>...",
        })
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let names = tokens(event);
        if names.is_empty() {
            return;
        }
        let stage = self.stage;
        for name in &names {
            cx.submit(self.pool.request(|c| c.set(stage, name)), "load_shader");
        }
        cx.finish(event);
    }
}

/// `<name> <vert|frag> <path>`
pub(crate) struct CompileShader {
    pool: SlotPool<kinds::CompileShader>,
}

impl CompileShader {
    pub(crate) fn new(pool: SlotPool<kinds::CompileShader>) -> Self {
        Self { pool }
    }
}

impl State for CompileShader {
    fn name(&self) -> &'static str {
        "compile_shader"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn prompt(&self) -> Option<&'static str> {
        Some("compile: <name> <vert|frag> <source path>")
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let [name, stage, path] = tokens.as_slice() else {
            return;
        };
        let Ok(stage) = stage.parse::<ShaderStage>() else {
            return;
        };
        cx.submit(
            self.pool.request(|c| c.set(stage, name, Path::new(path))),
            "compile_shader",
        );
        cx.finish(event);
    }
}

/// `<shader> <int|float> <a> <b>`
pub(crate) struct SetSpec {
    pool: SlotPool<kinds::SetSpec>,
}

impl SetSpec {
    pub(crate) fn new(pool: SlotPool<kinds::SetSpec>) -> Self {
        Self { pool }
    }
}

fn spec_constants(kind: &str, a: &str, b: &str) -> Option<SpecConstants> {
    match kind {
        "int" => Some(SpecConstants::Int(num(a)?, num(b)?)),
        "float" => Some(SpecConstants::Float(num(a)?, num(b)?)),
        _ => None,
    }
}

impl State for SetSpec {
    fn name(&self) -> &'static str {
        "set_spec"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        usage(cx, "set_spec: <shader> <int|float> <a> <b>");
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let [shader, kind, a, b] = tokens.as_slice() else {
            return;
        };
        let Some(values) = spec_constants(kind, a, b) else {
            return;
        };
        cx.submit(self.pool.request(|c| c.set(shader, values)), "set_spec");
        cx.finish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_constants_parse_by_kind() {
        assert_eq!(spec_constants("int", "1", "-2"), Some(SpecConstants::Int(1, -2)));
        assert_eq!(
            spec_constants("float", "0.5", "2"),
            Some(SpecConstants::Float(0.5, 2.0))
        );
        assert_eq!(spec_constants("int", "0.5", "2"), None);
        assert_eq!(spec_constants("double", "1", "2"), None);
    }
}
