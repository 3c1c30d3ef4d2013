//! Concrete command kinds, one pool per kind.
//!
//! Each kind is a plain `Default` value with a `set` initializer called from
//! [`pool::SlotPool::request`] and a [`pool::Recycle`] impl that clears it
//! for reuse.

mod descriptor;
mod pass;
mod pipeline;
mod render;
mod shader;
mod window;

pub use descriptor::{
    AddFrameUniformBuffer, BindUboData, CreateDescriptorSetLayout, CreateFrameDescriptorSets,
    UpdateFrameSamplers,
};
pub use pass::{CreateAttachment, CreateRenderPass};
pub use pipeline::{CreateGraphicsPipeline, CreatePipelineLayout};
pub use render::{CreateRenderLayer, ListResources, RecordRenderCommand, RenderFrame, SaveSwapImage};
pub use shader::{CompileShader, LoadShader, RecreatePipelines, SetSpec};
pub use window::{OpenWindow, PrepareRenderFrames};

use crate::error::{CommandError, CommandResult};

fn named(name: &str, what: &'static str) -> CommandResult<()> {
    if name.is_empty() {
        Err(CommandError::Unnamed(what))
    } else {
        Ok(())
    }
}

fn refill(dst: &mut Vec<String>, src: impl IntoIterator<Item = impl Into<String>>) {
    dst.clear();
    dst.extend(src.into_iter().map(Into::into));
}
