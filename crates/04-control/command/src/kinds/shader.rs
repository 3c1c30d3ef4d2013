use super::named;
use crate::command::{Command, ExecCx};
use crate::error::CommandResult;
use crate::report::{Report, ShaderReport};
use pool::{Recycle, SlotPool};
use render_abi::{ShaderStage, SpecConstants};
use std::path::{Path, PathBuf};

/// Loads a precompiled module by name.
#[derive(Debug)]
pub struct LoadShader {
    stage: ShaderStage,
    name: String,
}

impl Default for LoadShader {
    fn default() -> Self {
        Self {
            stage: ShaderStage::Vertex,
            name: String::new(),
        }
    }
}

impl LoadShader {
    pub fn set(&mut self, stage: ShaderStage, name: &str) {
        self.stage = stage;
        self.name.push_str(name);
    }
}

impl Recycle for LoadShader {
    fn reset(&mut self) {
        self.name.clear();
    }
}

impl Command for LoadShader {
    fn name(&self) -> &'static str {
        match self.stage {
            ShaderStage::Vertex => "load_vert_shader",
            ShaderStage::Fragment => "load_frag_shader",
        }
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        named(&self.name, "shader")?;
        cx.renderer().load_shader(self.stage, &self.name)?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::Shader(ShaderReport {
            name: self.name.clone(),
            stage: self.stage,
            source: None,
        }));
    }
}

/// Compiles a shader from source.
///
/// A first compile registers the source with the file watcher and reports
/// the shader. A reload (the source changed) reports nothing and instead
/// queues a [`RecreatePipelines`] follow-up for the pipelines using it.
#[derive(Default)]
pub struct CompileShader {
    stage: Option<ShaderStage>,
    name: String,
    source: PathBuf,
    reload: Option<SlotPool<RecreatePipelines>>,
}

impl CompileShader {
    pub fn set(&mut self, stage: ShaderStage, name: &str, source: &Path) {
        self.stage = Some(stage);
        self.name.push_str(name);
        self.source.push(source);
    }

    /// Marks this compile as a reload that rebuilds dependent pipelines.
    pub fn set_reload(
        &mut self,
        stage: ShaderStage,
        name: &str,
        source: &Path,
        recreate: &SlotPool<RecreatePipelines>,
    ) {
        self.set(stage, name, source);
        self.reload = Some(recreate.clone());
    }
}

impl Recycle for CompileShader {
    fn reset(&mut self) {
        self.stage = None;
        self.name.clear();
        self.source.as_mut_os_string().clear();
        self.reload = None;
    }
}

impl Command for CompileShader {
    fn name(&self) -> &'static str {
        "compile_shader"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        named(&self.name, "compiled shader")?;
        let stage = self.stage.unwrap_or(ShaderStage::Vertex);
        cx.renderer().compile_shader(stage, &self.name, &self.source)?;
        if self.reload.is_none() {
            cx.watch(self.source.clone());
        }
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        match &self.reload {
            Some(recreate) => {
                cx.notice(&format!("recompiled {}", self.name));
                let name = self.name.as_str();
                cx.follow_up(recreate.request(|c| c.set(name)), "recreate_pipelines");
            }
            None => cx.publish(Report::Shader(ShaderReport {
                name: self.name.clone(),
                stage: self.stage.unwrap_or(ShaderStage::Vertex),
                source: Some(self.source.clone()),
            })),
        }
    }
}

/// Rebuilds every pipeline that uses a shader.
#[derive(Default, Debug)]
pub struct RecreatePipelines {
    shader: String,
}

impl RecreatePipelines {
    pub fn set(&mut self, shader: &str) {
        self.shader.push_str(shader);
    }
}

impl Recycle for RecreatePipelines {
    fn reset(&mut self) {
        self.shader.clear();
    }
}

impl Command for RecreatePipelines {
    fn name(&self) -> &'static str {
        "recreate_pipelines"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        let rebuilt = cx.renderer().recreate_graphics_pipelines(&self.shader)?;
        if !rebuilt.is_empty() {
            cx.notice(&format!("rebuilt pipelines: {}", rebuilt.join(", ")));
        }
        Ok(())
    }
}

/// Sets a specialization constant pair on a shader.
#[derive(Debug)]
pub struct SetSpec {
    shader: String,
    values: SpecConstants,
}

impl Default for SetSpec {
    fn default() -> Self {
        Self {
            shader: String::new(),
            values: SpecConstants::Int(0, 0),
        }
    }
}

impl SetSpec {
    pub fn set(&mut self, shader: &str, values: SpecConstants) {
        self.shader.push_str(shader);
        self.values = values;
    }
}

impl Recycle for SetSpec {
    fn reset(&mut self) {
        self.shader.clear();
        self.values = SpecConstants::Int(0, 0);
    }
}

impl Command for SetSpec {
    fn name(&self) -> &'static str {
        match self.values {
            SpecConstants::Int(..) => "set_spec_int",
            SpecConstants::Float(..) => "set_spec_float",
        }
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        named(&self.shader, "spec constant target")?;
        cx.renderer().set_spec_constants(&self.shader, self.values)?;
        Ok(())
    }
}
