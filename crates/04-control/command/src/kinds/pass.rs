use super::{named, refill};
use crate::command::{Command, ExecCx};
use crate::error::CommandResult;
use crate::report::{AttachmentReport, RenderPassReport, Report};
use pool::Recycle;
use render_abi::{AttachmentDesc, RenderPassTarget};

#[derive(Default, Debug)]
pub struct CreateAttachment {
    desc: AttachmentDesc,
}

impl CreateAttachment {
    pub fn set(&mut self, desc: AttachmentDesc) {
        self.desc = desc;
    }
}

impl Recycle for CreateAttachment {
    fn reset(&mut self) {
        self.desc.name.clear();
        self.desc.width = 0;
        self.desc.height = 0;
        self.desc.sampled = false;
        self.desc.transfer_src = false;
    }
}

impl Command for CreateAttachment {
    fn name(&self) -> &'static str {
        "create_attachment"
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        named(&self.desc.name, "attachment")?;
        cx.renderer().create_attachment(&self.desc)?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::Attachment(AttachmentReport {
            desc: self.desc.clone(),
        }));
    }
}

/// Creates a swapchain render pass, or an offscreen one when attachments are given.
#[derive(Default, Debug)]
pub struct CreateRenderPass {
    name: String,
    offscreen: bool,
    attachments: Vec<String>,
}

impl CreateRenderPass {
    pub fn set_swapchain(&mut self, name: &str) {
        self.name.push_str(name);
        self.offscreen = false;
    }

    pub fn set_offscreen<S: Into<String>>(
        &mut self,
        name: &str,
        attachments: impl IntoIterator<Item = S>,
    ) {
        self.name.push_str(name);
        self.offscreen = true;
        refill(&mut self.attachments, attachments);
    }

    fn target(&self) -> RenderPassTarget {
        if self.offscreen {
            RenderPassTarget::Offscreen {
                attachments: self.attachments.clone(),
            }
        } else {
            RenderPassTarget::Swapchain
        }
    }
}

impl Recycle for CreateRenderPass {
    fn reset(&mut self) {
        self.name.clear();
        self.offscreen = false;
        self.attachments.clear();
    }
}

impl Command for CreateRenderPass {
    fn name(&self) -> &'static str {
        if self.offscreen {
            "create_offscreen_render_pass"
        } else {
            "create_swapchain_render_pass"
        }
    }

    fn execute(&mut self, cx: &mut ExecCx<'_>) -> CommandResult<()> {
        named(&self.name, "render pass")?;
        cx.renderer().create_render_pass(&self.name, &self.target())?;
        Ok(())
    }

    fn on_success(&mut self, cx: &mut ExecCx<'_>) {
        cx.publish(Report::RenderPass(RenderPassReport {
            name: self.name.clone(),
            target: self.target(),
        }));
    }
}
