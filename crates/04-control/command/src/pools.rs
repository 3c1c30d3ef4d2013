use crate::error::{CommandError, CommandResult};
use crate::kinds::*;
use pool::{Recycle, SlotPool};

/// Largest capacity any command pool may be configured with.
pub const MAX_POOL_CAPACITY: usize = 20;

/// Per-kind pool sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolCapacities {
    /// Default for every command kind not listed below.
    pub commands: usize,
    /// Shader loads; one input line may name several shaders.
    pub shaders: usize,
    /// Frame submissions; one in flight means a slow frame skips the next.
    pub render_frame: usize,
    /// Uniform writes driven by pointer input.
    pub bind_ubo: usize,
    /// Resource listings.
    pub list_resources: usize,
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self {
            commands: 5,
            shaders: 8,
            render_frame: 1,
            bind_ubo: 1,
            list_resources: 1,
        }
    }
}

/// One pool per command kind, shared by the states that issue them.
#[derive(Clone, Debug)]
pub struct CommandPools {
    pub open_window: SlotPool<OpenWindow>,
    pub prepare_render_frames: SlotPool<PrepareRenderFrames>,
    pub load_shader: SlotPool<LoadShader>,
    pub compile_shader: SlotPool<CompileShader>,
    pub recreate_pipelines: SlotPool<RecreatePipelines>,
    pub set_spec: SlotPool<SetSpec>,
    pub create_attachment: SlotPool<CreateAttachment>,
    pub create_render_pass: SlotPool<CreateRenderPass>,
    pub create_descriptor_set_layout: SlotPool<CreateDescriptorSetLayout>,
    pub create_frame_descriptor_sets: SlotPool<CreateFrameDescriptorSets>,
    pub add_frame_uniform_buffer: SlotPool<AddFrameUniformBuffer>,
    pub update_frame_samplers: SlotPool<UpdateFrameSamplers>,
    pub bind_ubo_data: SlotPool<BindUboData>,
    pub create_pipeline_layout: SlotPool<CreatePipelineLayout>,
    pub create_graphics_pipeline: SlotPool<CreateGraphicsPipeline>,
    pub create_render_layer: SlotPool<CreateRenderLayer>,
    pub record_render_command: SlotPool<RecordRenderCommand>,
    pub render_frame: SlotPool<RenderFrame>,
    pub save_swap_image: SlotPool<SaveSwapImage>,
    pub list_resources: SlotPool<ListResources>,
}

fn sized<T: Recycle>(label: &'static str, capacity: usize) -> CommandResult<SlotPool<T>> {
    if capacity == 0 || capacity > MAX_POOL_CAPACITY {
        return Err(CommandError::Capacity {
            label,
            requested: capacity,
            max: MAX_POOL_CAPACITY,
        });
    }
    Ok(SlotPool::new(label, capacity)?)
}

impl CommandPools {
    pub fn new(caps: &PoolCapacities) -> CommandResult<Self> {
        let n = caps.commands;
        Ok(Self {
            open_window: sized("open_window", n)?,
            prepare_render_frames: sized("prepare_render_frames", n)?,
            load_shader: sized("load_shader", caps.shaders)?,
            compile_shader: sized("compile_shader", n)?,
            recreate_pipelines: sized("recreate_pipelines", n)?,
            set_spec: sized("set_spec", n)?,
            create_attachment: sized("create_attachment", n)?,
            create_render_pass: sized("create_render_pass", n)?,
            create_descriptor_set_layout: sized("create_descriptor_set_layout", n)?,
            create_frame_descriptor_sets: sized("create_frame_descriptor_sets", n)?,
            add_frame_uniform_buffer: sized("add_frame_uniform_buffer", n)?,
            update_frame_samplers: sized("update_frame_samplers", n)?,
            bind_ubo_data: sized("bind_ubo_data", caps.bind_ubo)?,
            create_pipeline_layout: sized("create_pipeline_layout", n)?,
            create_graphics_pipeline: sized("create_graphics_pipeline", n)?,
            create_render_layer: sized("create_render_layer", n)?,
            record_render_command: sized("record_render_command", n)?,
            render_frame: sized("render_frame", caps.render_frame)?,
            save_swap_image: sized("save_swap_image", n)?,
            list_resources: sized("list_resources", caps.list_resources)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let pools = CommandPools::new(&PoolCapacities::default()).unwrap();
        assert_eq!(pools.create_pipeline_layout.capacity(), 5);
        assert_eq!(pools.render_frame.capacity(), 1);
    }

    #[test]
    fn oversized_pool_is_rejected() {
        let caps = PoolCapacities {
            commands: MAX_POOL_CAPACITY + 1,
            ..PoolCapacities::default()
        };
        assert!(matches!(
            CommandPools::new(&caps),
            Err(CommandError::Capacity { requested: 21, .. })
        ));
    }
}
