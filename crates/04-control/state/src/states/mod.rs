//! The render control tree.
//!
//! ```text
//! director
//! └── render_manager
//!     ├── open_window, prepare_render_frames                (brief)
//!     ├── shader_manager       → load_*_shaders, compile_shader, set_spec
//!     ├── descriptor_manager   → create_descriptor_set_layout, create_frame_descriptor_sets,
//!     │                          init_frame_ubos, update_frame_samplers, bind_ubo
//!     ├── render_pass_manager  → create_attachment, create_*_render_pass
//!     ├── pipeline_manager     → create_pipeline_layout, create_graphics_pipeline
//!     └── create_render_layer, record_render_command, render, save_swap_image
//! ```

mod descriptor;
mod director;
mod parse;
mod pass;
mod pipeline;
mod render;
mod shader;

pub use descriptor::{DescriptorLeaves, DescriptorManager, DescriptorOp};
pub use director::{Director, DirectorOp};
pub use pass::{PassLeaves, PassOp, RenderPassManager};
pub use pipeline::{PipelineLeaves, PipelineManager, PipelineOp};
pub use render::{RenderChildren, RenderManager, RenderOp};
pub use shader::{ShaderLeaves, ShaderManager, ShaderOp};

use crate::{Links, MachineBuilder, StateMachine};
use command::CommandPools;
use render_abi::ShaderStage;

/// Settings the tree needs at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Extent requested by `open_window`.
    pub width: u32,
    /// Extent requested by `open_window`.
    pub height: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Builds the full tree with `director` on the stack.
pub fn build(links: Links, pools: &CommandPools, config: &TreeConfig) -> StateMachine {
    let mut b = MachineBuilder::new(links);

    let shader = ShaderLeaves {
        load_frag: b.add(shader::LoadShaders::new(
            ShaderStage::Fragment,
            pools.load_shader.clone(),
        )),
        load_vert: b.add(shader::LoadShaders::new(
            ShaderStage::Vertex,
            pools.load_shader.clone(),
        )),
        compile: b.add(shader::CompileShader::new(pools.compile_shader.clone())),
        set_spec: b.add(shader::SetSpec::new(pools.set_spec.clone())),
    };
    let shader_manager = b.add(ShaderManager::new(shader));
    b.adopt(shader_manager, &shader.all());

    let descriptor = DescriptorLeaves {
        layout: b.add(descriptor::CreateLayout::new(
            pools.create_descriptor_set_layout.clone(),
        )),
        frame_sets: b.add(descriptor::CreateFrameSets::new(
            pools.create_frame_descriptor_sets.clone(),
        )),
        ubos: b.add(descriptor::InitFrameUbos::new(
            pools.add_frame_uniform_buffer.clone(),
        )),
        samplers: b.add(descriptor::UpdateSamplers::new(
            pools.update_frame_samplers.clone(),
        )),
        bind: b.add(descriptor::BindUbo::new(pools.bind_ubo_data.clone())),
    };
    let descriptor_manager = b.add(DescriptorManager::new(descriptor));
    b.adopt(descriptor_manager, &descriptor.all());

    let pass = PassLeaves {
        attachment: b.add(pass::CreateAttachment::new(pools.create_attachment.clone())),
        swapchain: b.add(pass::CreateRenderPass::swapchain(
            pools.create_render_pass.clone(),
        )),
        offscreen: b.add(pass::CreateRenderPass::offscreen(
            pools.create_render_pass.clone(),
        )),
    };
    let render_pass_manager = b.add(RenderPassManager::new(pass));
    b.adopt(render_pass_manager, &pass.all());

    let pipeline = PipelineLeaves {
        layout: b.add(pipeline::CreateLayout::new(
            pools.create_pipeline_layout.clone(),
        )),
        graphics: b.add(pipeline::CreateGraphics::new(
            pools.create_graphics_pipeline.clone(),
        )),
    };
    let pipeline_manager = b.add(PipelineManager::new(pipeline));
    b.adopt(pipeline_manager, &pipeline.all());

    let children = RenderChildren {
        open_window: b.add(render::OpenWindow::new(
            config.width,
            config.height,
            pools.open_window.clone(),
        )),
        prepare_frames: b.add(render::PrepareFrames::new(
            pools.prepare_render_frames.clone(),
        )),
        shader_manager,
        descriptor_manager,
        render_pass_manager,
        pipeline_manager,
        render_layer: b.add(render::CreateRenderLayer::new(
            pools.create_render_layer.clone(),
        )),
        record: b.add(render::RecordRenderCommand::new(
            pools.record_render_command.clone(),
        )),
        render: b.add(render::Render),
        save: b.add(render::SaveSwapImage::new(pools.save_swap_image.clone())),
    };
    let render_manager = b.add(RenderManager::new(children, pools.bind_ubo_data.clone()));
    b.adopt(render_manager, &children.all());

    let director = b.add(Director::new(render_manager, pools));
    b.adopt(director, &[render_manager]);
    b.build(director)
}
