use crate::command::{Command, ExecCx};
use crate::error::CommandResult;
use crate::report::{Report, WindowReport};
use pool::Recycle;

#[derive(Default, Debug)]
pub struct OpenWindow {
    width: u32,
    height: u32,
}

impl OpenWindow {
    pub fn set(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

impl Recycle for OpenWindow {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Command for OpenWindow {
    fn name(&self) -> &'static str {
        "open_window"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        cx.renderer().open_window(self.width, self.height)?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::Window(WindowReport {
            width: self.width,
            height: self.height,
        }));
    }
}

#[derive(Default, Debug)]
pub struct PrepareRenderFrames;

impl Recycle for PrepareRenderFrames {
    fn reset(&mut self) {}
}

impl Command for PrepareRenderFrames {
    fn name(&self) -> &'static str {
        "prepare_render_frames"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        cx.renderer().prepare_render_frames()?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::RenderFrames);
    }
}
