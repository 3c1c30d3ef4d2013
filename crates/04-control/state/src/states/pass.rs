use super::parse::{num, tokens, usage};
use crate::{branch_options, BranchOption, OptionMap, OptionMask, ReportLog, State, StateCx, StateId, StateKind};
use command::kinds;
use command::Report;
use event::Event;
use pool::SlotPool;
use render_abi::AttachmentDesc;

branch_options! {
    /// Options of [`RenderPassManager`].
    pub enum PassOp {
        CreateAttachment => "create_attachment",
        CreateSwapchainRenderPass => "create_swapchain_render_pass",
        CreateOffscreenRenderPass => "create_offscreen_render_pass",
        PrintReports => "print_reports",
    }
}

/// Leaf ids owned by [`RenderPassManager`].
#[derive(Clone, Copy, Debug)]
pub struct PassLeaves {
    /// `create_attachment`
    pub attachment: StateId,
    /// `create_swapchain_render_pass`
    pub swapchain: StateId,
    /// `create_offscreen_render_pass`
    pub offscreen: StateId,
}

impl PassLeaves {
    pub(crate) fn all(&self) -> [StateId; 3] {
        [self.attachment, self.swapchain, self.offscreen]
    }
}

/// Attachments and the render passes that write them.
pub struct RenderPassManager {
    leaves: PassLeaves,
    reports: ReportLog,
}

impl RenderPassManager {
    /// Branch over `leaves`.
    pub fn new(leaves: PassLeaves) -> Self {
        Self {
            leaves,
            reports: ReportLog::default(),
        }
    }
}

impl State for RenderPassManager {
    fn name(&self) -> &'static str {
        "render_pass_manager"
    }

    fn kind(&self) -> StateKind {
        StateKind::Branch
    }

    fn options(&self) -> (OptionMap, OptionMask) {
        let active = OptionMask::of(&[
            PassOp::CreateAttachment,
            PassOp::CreateSwapchainRenderPass,
            PassOp::PrintReports,
        ]);
        (PassOp::map(), active)
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let Some((op, rest)) = cx.extract::<PassOp>(event) else {
            return;
        };
        event.set_handled();
        let leaf = match op {
            PassOp::CreateAttachment => self.leaves.attachment,
            PassOp::CreateSwapchainRenderPass => self.leaves.swapchain,
            PassOp::CreateOffscreenRenderPass => self.leaves.offscreen,
            PassOp::PrintReports => {
                self.reports.print(cx, self.name());
                return;
            }
        };
        cx.push_seeded(leaf, &rest);
    }

    fn receive_report(&mut self, report: Report, cx: &mut StateCx<'_>) {
        match &report {
            Report::Attachment(attachment) => {
                cx.add_word(self.leaves.offscreen, &attachment.desc.name);
                cx.activate(PassOp::CreateOffscreenRenderPass);
                self.reports.push(report.clone());
            }
            Report::RenderPass(_) => {
                self.reports.push(report.clone());
            }
            _ => {}
        }
        cx.forward_to_parent(report);
    }
}

/// `<name> <width> <height> [sampled] [transfer_src]`
pub(crate) struct CreateAttachment {
    pool: SlotPool<kinds::CreateAttachment>,
}

impl CreateAttachment {
    pub(crate) fn new(pool: SlotPool<kinds::CreateAttachment>) -> Self {
        Self { pool }
    }
}

fn attachment_desc(tokens: &[String]) -> Option<AttachmentDesc> {
    let [name, width, height, flags @ ..] = tokens else {
        return None;
    };
    let mut desc = AttachmentDesc {
        name: name.clone(),
        width: num(width)?,
        height: num(height)?,
        ..AttachmentDesc::default()
    };
    for flag in flags {
        match flag.as_str() {
            "sampled" => desc.sampled = true,
            "transfer_src" => desc.transfer_src = true,
            _ => return None,
        }
    }
    Some(desc)
}

impl State for CreateAttachment {
    fn name(&self) -> &'static str {
        "create_attachment"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn prompt(&self) -> Option<&'static str> {
        Some("attachment: <name> <width> <height> [sampled] [transfer_src]")
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let Some(desc) = attachment_desc(&tokens(event)) else {
            return;
        };
        cx.submit(self.pool.request(|c| c.set(desc)), "create_attachment");
        cx.finish(event);
    }
}

/// `<name>` for the swapchain pass, `<name> <attachment>...` for offscreen passes.
pub(crate) struct CreateRenderPass {
    offscreen: bool,
    pool: SlotPool<kinds::CreateRenderPass>,
}

impl CreateRenderPass {
    pub(crate) fn swapchain(pool: SlotPool<kinds::CreateRenderPass>) -> Self {
        Self {
            offscreen: false,
            pool,
        }
    }

    pub(crate) fn offscreen(pool: SlotPool<kinds::CreateRenderPass>) -> Self {
        Self {
            offscreen: true,
            pool,
        }
    }
}

impl State for CreateRenderPass {
    fn name(&self) -> &'static str {
        if self.offscreen {
            "create_offscreen_render_pass"
        } else {
            "create_swapchain_render_pass"
        }
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        if self.offscreen {
            usage(cx, "offscreen render pass: <name> <attachment>...");
        } else {
            cx.notice("swapchain render pass: <name>");
        }
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let Some((name, attachments)) = tokens.split_first() else {
            return;
        };
        let command = match (self.offscreen, attachments.is_empty()) {
            (false, true) => self.pool.request(|c| c.set_swapchain(name)),
            (true, false) => self
                .pool
                .request(|c| c.set_offscreen(name, attachments.iter().map(String::as_str))),
            _ => return,
        };
        cx.submit(command, "create_render_pass");
        cx.finish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn attachment_flags() {
        let desc = attachment_desc(&line("color 256 128 sampled")).unwrap();
        assert_eq!((desc.width, desc.height), (256, 128));
        assert!(desc.sampled && !desc.transfer_src);
        assert!(attachment_desc(&line("color 256")).is_none());
        assert!(attachment_desc(&line("color 256 128 shiny")).is_none());
    }
}
