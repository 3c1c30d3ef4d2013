use crate::command::{Command, ExecCx};
use crate::error::CommandResult;
use crate::report::{RenderCommandReport, RenderLayerReport, Report};
use pool::Recycle;
use render_abi::{RenderLayerDesc, ResourceKind};
use smallvec::SmallVec;
use std::path::{Path, PathBuf};

#[derive(Default, Debug)]
pub struct CreateRenderLayer {
    desc: RenderLayerDesc,
    created: Option<u32>,
}

impl CreateRenderLayer {
    pub fn set(&mut self, desc: RenderLayerDesc) {
        self.desc = desc;
    }
}

impl Recycle for CreateRenderLayer {
    fn reset(&mut self) {
        self.desc = RenderLayerDesc::default();
        self.created = None;
    }
}

impl Command for CreateRenderLayer {
    fn name(&self) -> &'static str {
        "create_render_layer"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        self.created = Some(cx.renderer().create_render_layer(&self.desc)?);
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        if let Some(index) = self.created {
            cx.publish(Report::RenderLayer(RenderLayerReport {
                index,
                desc: self.desc.clone(),
            }));
        }
    }
}

#[derive(Default, Debug)]
pub struct RecordRenderCommand {
    index: u32,
    layers: SmallVec<[u32; 4]>,
}

impl RecordRenderCommand {
    pub fn set(&mut self, index: u32, layers: &[u32]) {
        self.index = index;
        self.layers.extend_from_slice(layers);
    }
}

impl Recycle for RecordRenderCommand {
    fn reset(&mut self) {
        self.index = 0;
        self.layers.clear();
    }
}

impl Command for RecordRenderCommand {
    fn name(&self) -> &'static str {
        "record_render_command"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        cx.renderer()
            .record_render_commands(self.index, &self.layers)?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::RenderCommand(RenderCommandReport {
            index: self.index,
            layers: self.layers.to_vec(),
        }));
    }
}

/// Submits one frame using a recorded render command.
#[derive(Default, Debug)]
pub struct RenderFrame {
    command: u32,
}

impl RenderFrame {
    pub fn set(&mut self, command: u32) {
        self.command = command;
    }
}

impl Recycle for RenderFrame {
    fn reset(&mut self) {
        self.command = 0;
    }
}

impl Command for RenderFrame {
    fn name(&self) -> &'static str {
        "render_frame"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        cx.renderer().render_frame(self.command)?;
        Ok(())
    }
}

#[derive(Default, Debug)]
pub struct SaveSwapImage {
    path: PathBuf,
}

impl SaveSwapImage {
    pub fn set(&mut self, path: &Path) {
        self.path.push(path);
    }
}

impl Recycle for SaveSwapImage {
    fn reset(&mut self) {
        self.path.as_mut_os_string().clear();
    }
}

impl Command for SaveSwapImage {
    fn name(&self) -> &'static str {
        "save_swap_image"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        cx.renderer().save_swap_image(&self.path)?;
        cx.notice(&format!("saved swap image to {}", self.path.display()));
        Ok(())
    }
}

/// Prints what the renderer currently holds.
#[derive(Default, Debug)]
pub struct ListResources;

impl Recycle for ListResources {
    fn reset(&mut self) {}
}

impl Command for ListResources {
    fn name(&self) -> &'static str {
        "list_resources"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        let renderer = cx.renderer();
        for kind in ResourceKind::ALL {
            let names = renderer.list(kind);
            if names.is_empty() {
                cx.notice(&format!("{}: none", kind.label()));
            } else {
                cx.notice(&format!("{}: {}", kind.label(), names.join(", ")));
            }
        }
        Ok(())
    }
}
