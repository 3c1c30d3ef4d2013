use super::{named, refill};
use crate::command::{Command, ExecCx};
use crate::error::CommandResult;
use crate::report::{GraphicsPipelineReport, PipelineLayoutReport, Report};
use pool::Recycle;
use render_abi::GraphicsPipelineDesc;

#[derive(Default, Debug)]
pub struct CreatePipelineLayout {
    name: String,
    set_layouts: Vec<String>,
}

impl CreatePipelineLayout {
    pub fn set<S: Into<String>>(&mut self, name: &str, set_layouts: impl IntoIterator<Item = S>) {
        self.name.push_str(name);
        refill(&mut self.set_layouts, set_layouts);
    }
}

impl Recycle for CreatePipelineLayout {
    fn reset(&mut self) {
        self.name.clear();
        self.set_layouts.clear();
    }
}

impl Command for CreatePipelineLayout {
    fn name(&self) -> &'static str {
        "create_pipeline_layout"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        named(&self.name, "pipeline layout")?;
        cx.renderer()
            .create_pipeline_layout(&self.name, &self.set_layouts)?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::PipelineLayout(PipelineLayoutReport {
            name: self.name.clone(),
            set_layouts: self.set_layouts.clone(),
        }));
    }
}

#[derive(Default, Debug)]
pub struct CreateGraphicsPipeline {
    desc: GraphicsPipelineDesc,
}

impl CreateGraphicsPipeline {
    pub fn set(&mut self, desc: GraphicsPipelineDesc) {
        self.desc = desc;
    }
}

impl Recycle for CreateGraphicsPipeline {
    fn reset(&mut self) {
        self.desc = GraphicsPipelineDesc::default();
    }
}

impl Command for CreateGraphicsPipeline {
    fn name(&self) -> &'static str {
        "create_graphics_pipeline"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        named(&self.desc.name, "graphics pipeline")?;
        cx.renderer().create_graphics_pipeline(&self.desc)?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::GraphicsPipeline(GraphicsPipelineReport {
            desc: self.desc.clone(),
        }));
    }
}
