//! Contracts between the control plane and its rendering collaborators.
//!
//! This crate defines the boundary between commands (layer 04) and the
//! implementations that own a device or a window (layer 03), with no
//! control-plane dependencies.

#![allow(missing_docs)]

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

mod error;
mod window;

pub use error::{RenderError, RenderResult};
pub use window::{NativeEvent, NativeKind, WindowSource};

/// Programmable stage a shader module binds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert",
            ShaderStage::Fragment => "frag",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShaderStage {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vert" | "vertex" => Ok(ShaderStage::Vertex),
            "frag" | "fragment" => Ok(ShaderStage::Fragment),
            other => Err(RenderError::Invalid(format!("unknown shader stage `{other}`"))),
        }
    }
}

/// Specialization constant pair applied to a shader.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum SpecConstants {
    Int(i32, i32),
    Float(f32, f32),
}

/// Image attachment owned by the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AttachmentDesc {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Readable from shaders.
    pub sampled: bool,
    /// Usable as a copy source (image save).
    pub transfer_src: bool,
}

/// Where a render pass writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RenderPassTarget {
    Swapchain,
    Offscreen { attachments: Vec<String> },
}

/// Descriptor type of one binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DescriptorKind {
    UniformBuffer,
    CombinedImageSampler,
}

/// Shader stages that can read a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BindingStages {
    Vertex,
    Fragment,
    All,
}

/// One binding of a descriptor set layout; the binding number is its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub kind: DescriptorKind,
    pub stages: BindingStages,
}

impl FromStr for Binding {
    type Err = RenderError;

    /// Parses `kind[:stages]`, e.g. `ubo:frag` or `sampler`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, stages) = s.split_once(':').unwrap_or((s, "all"));
        let kind = match kind {
            "ubo" | "uniform_buffer" => DescriptorKind::UniformBuffer,
            "sampler" | "combined_image_sampler" => DescriptorKind::CombinedImageSampler,
            other => return Err(RenderError::Invalid(format!("unknown descriptor `{other}`"))),
        };
        let stages = match stages {
            "vert" => BindingStages::Vertex,
            "frag" => BindingStages::Fragment,
            "all" => BindingStages::All,
            other => return Err(RenderError::Invalid(format!("unknown stages `{other}`"))),
        };
        Ok(Binding { kind, stages })
    }
}

/// Viewport/scissor rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Everything needed to build a graphics pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphicsPipelineDesc {
    pub name: String,
    pub layout: String,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub render_pass: String,
    pub area: Area,
    pub is_3d: bool,
}

/// A render pass bound to a target attachment and a pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderLayerDesc {
    /// Target attachment, or `swap` for the swapchain image.
    pub attachment: String,
    pub render_pass: String,
    pub pipeline: String,
}

/// Resource families exposed by [`Renderer::list`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    Shaders,
    Attachments,
    RenderPasses,
    DescriptorSetLayouts,
    PipelineLayouts,
    Pipelines,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Shaders,
        ResourceKind::Attachments,
        ResourceKind::RenderPasses,
        ResourceKind::DescriptorSetLayouts,
        ResourceKind::PipelineLayouts,
        ResourceKind::Pipelines,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Shaders => "shaders",
            ResourceKind::Attachments => "attachments",
            ResourceKind::RenderPasses => "render passes",
            ResourceKind::DescriptorSetLayouts => "descriptor set layouts",
            ResourceKind::PipelineLayouts => "pipeline layouts",
            ResourceKind::Pipelines => "pipelines",
        }
    }
}

/// Device-side operations the execution thread drives.
///
/// Calls arrive from the execution thread one at a time; implementations
/// must still be `Sync` because the handle is shared with the dispatch thread.
pub trait Renderer: Send + Sync {
    fn open_window(&self, width: u32, height: u32) -> RenderResult<()>;
    fn prepare_render_frames(&self) -> RenderResult<()>;
    fn load_shader(&self, stage: ShaderStage, name: &str) -> RenderResult<()>;
    /// Compiles `source` and registers the result under `name`, replacing any
    /// module of the same name.
    fn compile_shader(&self, stage: ShaderStage, name: &str, source: &Path) -> RenderResult<()>;
    fn set_spec_constants(&self, shader: &str, values: SpecConstants) -> RenderResult<()>;
    fn create_attachment(&self, desc: &AttachmentDesc) -> RenderResult<()>;
    fn create_render_pass(&self, name: &str, target: &RenderPassTarget) -> RenderResult<()>;
    fn create_descriptor_set_layout(&self, name: &str, bindings: &[Binding]) -> RenderResult<()>;
    fn create_frame_descriptor_sets(&self, layouts: &[String]) -> RenderResult<()>;
    fn add_frame_uniform_buffer(&self, size: u32, binding: u32) -> RenderResult<()>;
    fn update_frame_samplers(&self, binding: u32, attachments: &[String]) -> RenderResult<()>;
    fn bind_ubo_data(&self, index: u32, data: &[f32]) -> RenderResult<()>;
    fn create_pipeline_layout(&self, name: &str, set_layouts: &[String]) -> RenderResult<()>;
    fn create_graphics_pipeline(&self, desc: &GraphicsPipelineDesc) -> RenderResult<()>;
    /// Rebuilds every pipeline that uses `shader`; returns their names.
    fn recreate_graphics_pipelines(&self, shader: &str) -> RenderResult<Vec<String>>;
    /// Returns the index of the new layer.
    fn create_render_layer(&self, desc: &RenderLayerDesc) -> RenderResult<u32>;
    fn record_render_commands(&self, command: u32, layers: &[u32]) -> RenderResult<()>;
    fn render_frame(&self, command: u32) -> RenderResult<()>;
    fn save_swap_image(&self, path: &Path) -> RenderResult<()>;
    fn list(&self, kind: ResourceKind) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_defaults_to_all_stages() {
        let binding: Binding = "ubo".parse().unwrap();
        assert_eq!(binding.kind, DescriptorKind::UniformBuffer);
        assert_eq!(binding.stages, BindingStages::All);
    }

    #[test]
    fn binding_with_stage_suffix() {
        let binding: Binding = "sampler:frag".parse().unwrap();
        assert_eq!(binding.kind, DescriptorKind::CombinedImageSampler);
        assert_eq!(binding.stages, BindingStages::Fragment);
        assert!("ubo:geom".parse::<Binding>().is_err());
    }

    #[test]
    fn stage_names() {
        assert_eq!("frag".parse::<ShaderStage>().unwrap(), ShaderStage::Fragment);
        assert_eq!(ShaderStage::Vertex.to_string(), "vert");
        assert!("comp".parse::<ShaderStage>().is_err());
    }
}
