use render_abi::{AttachmentDesc, Binding, GraphicsPipelineDesc, RenderLayerDesc, RenderPassTarget, ShaderStage};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

/// Window opened with this extent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowReport {
    pub width: u32,
    pub height: u32,
}

/// Shader module available under `name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderReport {
    pub name: String,
    pub stage: ShaderStage,
    /// Source file for compiled shaders; `None` for precompiled modules.
    pub source: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentReport {
    pub desc: AttachmentDesc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderPassReport {
    pub name: String,
    pub target: RenderPassTarget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorSetLayoutReport {
    pub name: String,
    pub bindings: Vec<Binding>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameDescriptorSetsReport {
    pub layouts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineLayoutReport {
    pub name: String,
    pub set_layouts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphicsPipelineReport {
    pub desc: GraphicsPipelineDesc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderLayerReport {
    pub index: u32,
    pub desc: RenderLayerDesc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderCommandReport {
    pub index: u32,
    pub layers: Vec<u32>,
}

/// Immutable fact published after a command succeeded.
///
/// Closed set: routing code matches on it exhaustively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Report {
    Window(WindowReport),
    RenderFrames,
    Shader(ShaderReport),
    Attachment(AttachmentReport),
    RenderPass(RenderPassReport),
    DescriptorSetLayout(DescriptorSetLayoutReport),
    FrameDescriptorSets(FrameDescriptorSetsReport),
    PipelineLayout(PipelineLayoutReport),
    GraphicsPipeline(GraphicsPipelineReport),
    RenderLayer(RenderLayerReport),
    RenderCommand(RenderCommandReport),
}

/// Discriminant of [`Report`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Window,
    RenderFrames,
    Shader,
    Attachment,
    RenderPass,
    DescriptorSetLayout,
    FrameDescriptorSets,
    PipelineLayout,
    GraphicsPipeline,
    RenderLayer,
    RenderCommand,
}

impl ReportKind {
    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Window => "window",
            ReportKind::RenderFrames => "render frames",
            ReportKind::Shader => "shader",
            ReportKind::Attachment => "attachment",
            ReportKind::RenderPass => "render pass",
            ReportKind::DescriptorSetLayout => "descriptor set layout",
            ReportKind::FrameDescriptorSets => "frame descriptor sets",
            ReportKind::PipelineLayout => "pipeline layout",
            ReportKind::GraphicsPipeline => "graphics pipeline",
            ReportKind::RenderLayer => "render layer",
            ReportKind::RenderCommand => "render command",
        }
    }
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Window(_) => ReportKind::Window,
            Report::RenderFrames => ReportKind::RenderFrames,
            Report::Shader(_) => ReportKind::Shader,
            Report::Attachment(_) => ReportKind::Attachment,
            Report::RenderPass(_) => ReportKind::RenderPass,
            Report::DescriptorSetLayout(_) => ReportKind::DescriptorSetLayout,
            Report::FrameDescriptorSets(_) => ReportKind::FrameDescriptorSets,
            Report::PipelineLayout(_) => ReportKind::PipelineLayout,
            Report::GraphicsPipeline(_) => ReportKind::GraphicsPipeline,
            Report::RenderLayer(_) => ReportKind::RenderLayer,
            Report::RenderCommand(_) => ReportKind::RenderCommand,
        }
    }

    /// Name other states use to refer to the reported object.
    pub fn object_name(&self) -> Cow<'_, str> {
        match self {
            Report::Window(_) => Cow::Borrowed("window"),
            Report::RenderFrames => Cow::Borrowed("render_frames"),
            Report::Shader(r) => Cow::Borrowed(&r.name),
            Report::Attachment(r) => Cow::Borrowed(&r.desc.name),
            Report::RenderPass(r) => Cow::Borrowed(&r.name),
            Report::DescriptorSetLayout(r) => Cow::Borrowed(&r.name),
            Report::FrameDescriptorSets(_) => Cow::Borrowed("frame_descriptor_sets"),
            Report::PipelineLayout(r) => Cow::Borrowed(&r.name),
            Report::GraphicsPipeline(r) => Cow::Borrowed(&r.desc.name),
            Report::RenderLayer(r) => Cow::Owned(r.index.to_string()),
            Report::RenderCommand(r) => Cow::Owned(r.index.to_string()),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind().label(), self.object_name())?;
        match self {
            Report::Window(r) => write!(f, ": {}x{}", r.width, r.height),
            Report::RenderFrames => Ok(()),
            Report::FrameDescriptorSets(r) => write!(f, ": {}", r.layouts.join(", ")),
            Report::Shader(r) => {
                write!(f, ": {}", r.stage)?;
                match &r.source {
                    Some(path) => write!(f, " from {}", path.display()),
                    None => Ok(()),
                }
            }
            Report::Attachment(r) => {
                write!(f, ": {}x{}", r.desc.width, r.desc.height)?;
                if r.desc.sampled {
                    f.write_str(" sampled")?;
                }
                if r.desc.transfer_src {
                    f.write_str(" transfer_src")?;
                }
                Ok(())
            }
            Report::RenderPass(r) => match &r.target {
                RenderPassTarget::Swapchain => f.write_str(": swapchain"),
                RenderPassTarget::Offscreen { attachments } => {
                    write!(f, ": offscreen [{}]", attachments.join(", "))
                }
            },
            Report::DescriptorSetLayout(r) => write!(f, ": {} bindings", r.bindings.len()),
            Report::PipelineLayout(r) => write!(f, ": [{}]", r.set_layouts.join(", ")),
            Report::GraphicsPipeline(r) => write!(
                f,
                ": layout {} shaders {}/{} pass {} area {}x{}+{}+{}{}",
                r.desc.layout,
                r.desc.vertex_shader,
                r.desc.fragment_shader,
                r.desc.render_pass,
                r.desc.area.width,
                r.desc.area.height,
                r.desc.area.x,
                r.desc.area.y,
                if r.desc.is_3d { " 3d" } else { "" }
            ),
            Report::RenderLayer(r) => write!(
                f,
                ": {} -> {} via {}",
                r.desc.render_pass, r.desc.attachment, r.desc.pipeline
            ),
            Report::RenderCommand(r) => {
                let layers: Vec<String> = r.layers.iter().map(u32::to_string).collect();
                write!(f, ": layers [{}]", layers.join(", "))
            }
        }
    }
}
