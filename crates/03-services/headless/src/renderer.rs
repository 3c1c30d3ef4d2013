use parking_lot::Mutex;
use render_abi::{
    AttachmentDesc, Binding, GraphicsPipelineDesc, RenderError, RenderLayerDesc,
    RenderPassTarget, RenderResult, Renderer, ResourceKind, ShaderStage, SpecConstants,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Swapchain pseudo-attachment accepted by render layers.
const SWAP: &str = "swap";

/// A pipeline and how many times it has been rebuilt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PipelineRecord {
    pub desc: GraphicsPipelineDesc,
    pub generation: u32,
}

/// Everything the headless device currently holds.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Ledger {
    pub window: Option<(u32, u32)>,
    pub frames_prepared: bool,
    pub shaders: BTreeMap<String, ShaderStage>,
    pub spec_constants: BTreeMap<String, SpecConstants>,
    pub attachments: BTreeMap<String, AttachmentDesc>,
    pub render_passes: BTreeMap<String, RenderPassTarget>,
    pub descriptor_set_layouts: BTreeMap<String, Vec<Binding>>,
    pub frame_descriptor_sets: Vec<String>,
    /// `(size, binding)` per frame uniform buffer.
    pub frame_uniform_buffers: Vec<(u32, u32)>,
    pub frame_samplers: BTreeMap<u32, Vec<String>>,
    pub ubo_data: BTreeMap<u32, Vec<f32>>,
    pub pipeline_layouts: BTreeMap<String, Vec<String>>,
    pub pipelines: BTreeMap<String, PipelineRecord>,
    pub render_layers: Vec<RenderLayerDesc>,
    pub render_commands: BTreeMap<u32, Vec<u32>>,
    pub frames_rendered: u64,
    pub saved_images: Vec<PathBuf>,
}

/// Renderer that keeps resources in memory and enforces creation order.
///
/// Every accepted call is appended to a call log so tests can assert on the
/// exact sequence the execution thread produced.
#[derive(Default)]
pub struct HeadlessRenderer {
    ledger: Mutex<Ledger>,
    calls: Mutex<Vec<String>>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the current resource state.
    pub fn ledger(&self) -> Ledger {
        self.ledger.lock().clone()
    }

    /// Accepted calls, in execution order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn log(&self, call: String) {
        tracing::debug!(%call, "headless renderer");
        self.calls.lock().push(call);
    }
}

fn require<V>(map: &BTreeMap<String, V>, kind: &'static str, name: &str) -> RenderResult<()> {
    if map.contains_key(name) {
        Ok(())
    } else {
        Err(RenderError::missing(kind, name))
    }
}

fn vacant<V>(map: &BTreeMap<String, V>, kind: &'static str, name: &str) -> RenderResult<()> {
    if map.contains_key(name) {
        Err(RenderError::duplicate(kind, name))
    } else {
        Ok(())
    }
}

fn require_stage(ledger: &Ledger, name: &str, stage: ShaderStage) -> RenderResult<()> {
    match ledger.shaders.get(name) {
        Some(found) if *found == stage => Ok(()),
        Some(_) => Err(RenderError::Invalid(format!(
            "shader `{name}` is not a {stage} shader"
        ))),
        None => Err(RenderError::missing("shader", name)),
    }
}

impl Renderer for HeadlessRenderer {
    fn open_window(&self, width: u32, height: u32) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        if ledger.window.is_some() {
            return Err(RenderError::duplicate("window", "main"));
        }
        ledger.window = Some((width, height));
        self.log(format!("open_window {width}x{height}"));
        Ok(())
    }

    fn prepare_render_frames(&self) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        if ledger.window.is_none() {
            return Err(RenderError::NotReady("open_window"));
        }
        ledger.frames_prepared = true;
        self.log("prepare_render_frames".into());
        Ok(())
    }

    fn load_shader(&self, stage: ShaderStage, name: &str) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        vacant(&ledger.shaders, "shader", name)?;
        ledger.shaders.insert(name.to_owned(), stage);
        self.log(format!("load_shader {stage} {name}"));
        Ok(())
    }

    fn compile_shader(&self, stage: ShaderStage, name: &str, source: &Path) -> RenderResult<()> {
        let code = fs::read_to_string(source)?;
        if code.trim().is_empty() {
            return Err(RenderError::Invalid(format!(
                "shader source `{}` is empty",
                source.display()
            )));
        }
        self.ledger.lock().shaders.insert(name.to_owned(), stage);
        self.log(format!("compile_shader {stage} {name} {}", source.display()));
        Ok(())
    }

    fn set_spec_constants(&self, shader: &str, values: SpecConstants) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        require(&ledger.shaders, "shader", shader)?;
        ledger.spec_constants.insert(shader.to_owned(), values);
        self.log(format!("set_spec_constants {shader} {values:?}"));
        Ok(())
    }

    fn create_attachment(&self, desc: &AttachmentDesc) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        vacant(&ledger.attachments, "attachment", &desc.name)?;
        if desc.width == 0 || desc.height == 0 {
            return Err(RenderError::Invalid(format!(
                "attachment `{}` has zero extent",
                desc.name
            )));
        }
        ledger.attachments.insert(desc.name.clone(), desc.clone());
        self.log(format!(
            "create_attachment {} {}x{}",
            desc.name, desc.width, desc.height
        ));
        Ok(())
    }

    fn create_render_pass(&self, name: &str, target: &RenderPassTarget) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        vacant(&ledger.render_passes, "render pass", name)?;
        if let RenderPassTarget::Offscreen { attachments } = target {
            for attachment in attachments {
                require(&ledger.attachments, "attachment", attachment)?;
            }
        }
        ledger.render_passes.insert(name.to_owned(), target.clone());
        self.log(format!("create_render_pass {name}"));
        Ok(())
    }

    fn create_descriptor_set_layout(&self, name: &str, bindings: &[Binding]) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        vacant(&ledger.descriptor_set_layouts, "descriptor set layout", name)?;
        ledger
            .descriptor_set_layouts
            .insert(name.to_owned(), bindings.to_vec());
        self.log(format!(
            "create_descriptor_set_layout {name} ({} bindings)",
            bindings.len()
        ));
        Ok(())
    }

    fn create_frame_descriptor_sets(&self, layouts: &[String]) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        for layout in layouts {
            require(&ledger.descriptor_set_layouts, "descriptor set layout", layout)?;
        }
        ledger.frame_descriptor_sets = layouts.to_vec();
        self.log(format!("create_frame_descriptor_sets {}", layouts.join(" ")));
        Ok(())
    }

    fn add_frame_uniform_buffer(&self, size: u32, binding: u32) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        if ledger.frame_descriptor_sets.is_empty() {
            return Err(RenderError::NotReady("create_frame_descriptor_sets"));
        }
        ledger.frame_uniform_buffers.push((size, binding));
        self.log(format!("add_frame_uniform_buffer {size} {binding}"));
        Ok(())
    }

    fn update_frame_samplers(&self, binding: u32, attachments: &[String]) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        if ledger.frame_descriptor_sets.is_empty() {
            return Err(RenderError::NotReady("create_frame_descriptor_sets"));
        }
        for attachment in attachments {
            require(&ledger.attachments, "attachment", attachment)?;
        }
        ledger.frame_samplers.insert(binding, attachments.to_vec());
        self.log(format!(
            "update_frame_samplers {binding} {}",
            attachments.join(" ")
        ));
        Ok(())
    }

    fn bind_ubo_data(&self, index: u32, data: &[f32]) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        if index as usize >= ledger.frame_uniform_buffers.len() {
            return Err(RenderError::missing("uniform buffer", index.to_string()));
        }
        ledger.ubo_data.insert(index, data.to_vec());
        self.log(format!("bind_ubo_data {index} {data:?}"));
        Ok(())
    }

    fn create_pipeline_layout(&self, name: &str, set_layouts: &[String]) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        vacant(&ledger.pipeline_layouts, "pipeline layout", name)?;
        for layout in set_layouts {
            require(&ledger.descriptor_set_layouts, "descriptor set layout", layout)?;
        }
        ledger
            .pipeline_layouts
            .insert(name.to_owned(), set_layouts.to_vec());
        self.log(format!(
            "create_pipeline_layout {name} {}",
            set_layouts.join(" ")
        ));
        Ok(())
    }

    fn create_graphics_pipeline(&self, desc: &GraphicsPipelineDesc) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        vacant(&ledger.pipelines, "pipeline", &desc.name)?;
        require(&ledger.pipeline_layouts, "pipeline layout", &desc.layout)?;
        require(&ledger.render_passes, "render pass", &desc.render_pass)?;
        require_stage(&ledger, &desc.vertex_shader, ShaderStage::Vertex)?;
        require_stage(&ledger, &desc.fragment_shader, ShaderStage::Fragment)?;
        ledger.pipelines.insert(
            desc.name.clone(),
            PipelineRecord {
                desc: desc.clone(),
                generation: 0,
            },
        );
        self.log(format!("create_graphics_pipeline {}", desc.name));
        Ok(())
    }

    fn recreate_graphics_pipelines(&self, shader: &str) -> RenderResult<Vec<String>> {
        let mut ledger = self.ledger.lock();
        require(&ledger.shaders, "shader", shader)?;
        let mut rebuilt = Vec::new();
        for (name, record) in ledger.pipelines.iter_mut() {
            if record.desc.vertex_shader == shader || record.desc.fragment_shader == shader {
                record.generation += 1;
                rebuilt.push(name.clone());
            }
        }
        self.log(format!("recreate_graphics_pipelines {shader}"));
        Ok(rebuilt)
    }

    fn create_render_layer(&self, desc: &RenderLayerDesc) -> RenderResult<u32> {
        let mut ledger = self.ledger.lock();
        if desc.attachment != SWAP {
            require(&ledger.attachments, "attachment", &desc.attachment)?;
        }
        require(&ledger.render_passes, "render pass", &desc.render_pass)?;
        require(&ledger.pipelines, "pipeline", &desc.pipeline)?;
        let index = ledger.render_layers.len() as u32;
        ledger.render_layers.push(desc.clone());
        self.log(format!(
            "create_render_layer {index} {} {} {}",
            desc.attachment, desc.render_pass, desc.pipeline
        ));
        Ok(index)
    }

    fn record_render_commands(&self, command: u32, layers: &[u32]) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        if !ledger.frames_prepared {
            return Err(RenderError::NotReady("prepare_render_frames"));
        }
        if let Some(layer) = layers
            .iter()
            .find(|&&l| l as usize >= ledger.render_layers.len())
        {
            return Err(RenderError::missing("render layer", layer.to_string()));
        }
        ledger.render_commands.insert(command, layers.to_vec());
        self.log(format!("record_render_commands {command} {layers:?}"));
        Ok(())
    }

    fn render_frame(&self, command: u32) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        if !ledger.render_commands.contains_key(&command) {
            return Err(RenderError::missing("render command", command.to_string()));
        }
        ledger.frames_rendered += 1;
        Ok(())
    }

    fn save_swap_image(&self, path: &Path) -> RenderResult<()> {
        let mut ledger = self.ledger.lock();
        if !ledger.frames_prepared {
            return Err(RenderError::NotReady("prepare_render_frames"));
        }
        ledger.saved_images.push(path.to_path_buf());
        self.log(format!("save_swap_image {}", path.display()));
        Ok(())
    }

    fn list(&self, kind: ResourceKind) -> Vec<String> {
        let ledger = self.ledger.lock();
        match kind {
            ResourceKind::Shaders => ledger.shaders.keys().cloned().collect(),
            ResourceKind::Attachments => ledger.attachments.keys().cloned().collect(),
            ResourceKind::RenderPasses => ledger.render_passes.keys().cloned().collect(),
            ResourceKind::DescriptorSetLayouts => {
                ledger.descriptor_set_layouts.keys().cloned().collect()
            }
            ResourceKind::PipelineLayouts => ledger.pipeline_layouts.keys().cloned().collect(),
            ResourceKind::Pipelines => ledger.pipelines.keys().cloned().collect(),
        }
    }
}
