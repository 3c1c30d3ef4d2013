use super::{named, refill};
use crate::command::{Command, ExecCx};
use crate::error::CommandResult;
use crate::report::{DescriptorSetLayoutReport, FrameDescriptorSetsReport, Report};
use pool::Recycle;
use render_abi::Binding;
use smallvec::SmallVec;

#[derive(Default, Debug)]
pub struct CreateDescriptorSetLayout {
    name: String,
    bindings: Vec<Binding>,
}

impl CreateDescriptorSetLayout {
    pub fn set(&mut self, name: &str, bindings: &[Binding]) {
        self.name.push_str(name);
        self.bindings.extend_from_slice(bindings);
    }
}

impl Recycle for CreateDescriptorSetLayout {
    fn reset(&mut self) {
        self.name.clear();
        self.bindings.clear();
    }
}

impl Command for CreateDescriptorSetLayout {
    fn name(&self) -> &'static str {
        "create_descriptor_set_layout"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        named(&self.name, "descriptor set layout")?;
        cx.renderer()
            .create_descriptor_set_layout(&self.name, &self.bindings)?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::DescriptorSetLayout(DescriptorSetLayoutReport {
            name: self.name.clone(),
            bindings: self.bindings.clone(),
        }));
    }
}

#[derive(Default, Debug)]
pub struct CreateFrameDescriptorSets {
    layouts: Vec<String>,
}

impl CreateFrameDescriptorSets {
    pub fn set<S: Into<String>>(&mut self, layouts: impl IntoIterator<Item = S>) {
        refill(&mut self.layouts, layouts);
    }
}

impl Recycle for CreateFrameDescriptorSets {
    fn reset(&mut self) {
        self.layouts.clear();
    }
}

impl Command for CreateFrameDescriptorSets {
    fn name(&self) -> &'static str {
        "create_frame_descriptor_sets"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        cx.renderer().create_frame_descriptor_sets(&self.layouts)?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::FrameDescriptorSets(FrameDescriptorSetsReport {
            layouts: self.layouts.clone(),
        }));
    }
}

#[derive(Default, Debug)]
pub struct AddFrameUniformBuffer {
    size: u32,
    binding: u32,
}

impl AddFrameUniformBuffer {
    pub fn set(&mut self, size: u32, binding: u32) {
        self.size = size;
        self.binding = binding;
    }
}

impl Recycle for AddFrameUniformBuffer {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Command for AddFrameUniformBuffer {
    fn name(&self) -> &'static str {
        "add_frame_uniform_buffer"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        cx.renderer()
            .add_frame_uniform_buffer(self.size, self.binding)?;
        Ok(())
    }
}

#[derive(Default, Debug)]
pub struct UpdateFrameSamplers {
    binding: u32,
    attachments: Vec<String>,
}

impl UpdateFrameSamplers {
    pub fn set<S: Into<String>>(&mut self, binding: u32, attachments: impl IntoIterator<Item = S>) {
        self.binding = binding;
        refill(&mut self.attachments, attachments);
    }
}

impl Recycle for UpdateFrameSamplers {
    fn reset(&mut self) {
        self.binding = 0;
        self.attachments.clear();
    }
}

impl Command for UpdateFrameSamplers {
    fn name(&self) -> &'static str {
        "update_frame_samplers"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        cx.renderer()
            .update_frame_samplers(self.binding, &self.attachments)?;
        Ok(())
    }
}

/// Writes floats into a frame uniform buffer.
#[derive(Default, Debug)]
pub struct BindUboData {
    index: u32,
    data: SmallVec<[f32; 4]>,
}

impl BindUboData {
    pub fn set(&mut self, index: u32, data: &[f32]) {
        self.index = index;
        self.data.extend_from_slice(data);
    }
}

impl Recycle for BindUboData {
    fn reset(&mut self) {
        self.index = 0;
        self.data.clear();
    }
}

impl Command for BindUboData {
    fn name(&self) -> &'static str {
        "bind_ubo_data"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        cx.renderer().bind_ubo_data(self.index, &self.data)?;
        Ok(())
    }
}
