use super::parse::{all, num, tokens, usage};
use crate::{branch_options, BranchOption, OptionMap, OptionMask, ReportLog, State, StateCx, StateId, StateKind};
use command::kinds;
use command::Report;
use event::Event;
use pool::SlotPool;
use render_abi::Binding;

branch_options! {
    /// Options of [`DescriptorManager`].
    pub enum DescriptorOp {
        CreateDescriptorSetLayout => "create_descriptor_set_layout",
        CreateFrameDescriptorSets => "create_frame_descriptor_sets",
        InitFrameUbos => "init_frame_ubos",
        UpdateFrameSamplers => "update_frame_samplers",
        BindUbo => "bind_ubo",
        PrintReports => "print_reports",
    }
}

/// Leaf ids owned by [`DescriptorManager`].
#[derive(Clone, Copy, Debug)]
pub struct DescriptorLeaves {
    /// `create_descriptor_set_layout`
    pub layout: StateId,
    /// `create_frame_descriptor_sets`
    pub frame_sets: StateId,
    /// `init_frame_ubos`
    pub ubos: StateId,
    /// `update_frame_samplers`
    pub samplers: StateId,
    /// `bind_ubo`
    pub bind: StateId,
}

impl DescriptorLeaves {
    pub(crate) fn all(&self) -> [StateId; 5] {
        [self.layout, self.frame_sets, self.ubos, self.samplers, self.bind]
    }
}

/// Descriptor set layouts, per-frame descriptor sets and their contents.
pub struct DescriptorManager {
    leaves: DescriptorLeaves,
    reports: ReportLog,
}

impl DescriptorManager {
    /// Branch over `leaves`.
    pub fn new(leaves: DescriptorLeaves) -> Self {
        Self {
            leaves,
            reports: ReportLog::default(),
        }
    }
}

impl State for DescriptorManager {
    fn name(&self) -> &'static str {
        "descriptor_manager"
    }

    fn kind(&self) -> StateKind {
        StateKind::Branch
    }

    fn options(&self) -> (OptionMap, OptionMask) {
        let active = OptionMask::of(&[
            DescriptorOp::CreateDescriptorSetLayout,
            DescriptorOp::BindUbo,
            DescriptorOp::PrintReports,
        ]);
        (DescriptorOp::map(), active)
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let Some((op, rest)) = cx.extract::<DescriptorOp>(event) else {
            return;
        };
        event.set_handled();
        let leaf = match op {
            DescriptorOp::CreateDescriptorSetLayout => self.leaves.layout,
            DescriptorOp::CreateFrameDescriptorSets => self.leaves.frame_sets,
            DescriptorOp::InitFrameUbos => self.leaves.ubos,
            DescriptorOp::UpdateFrameSamplers => self.leaves.samplers,
            DescriptorOp::BindUbo => self.leaves.bind,
            DescriptorOp::PrintReports => {
                self.reports.print(cx, self.name());
                return;
            }
        };
        cx.push_seeded(leaf, &rest);
    }

    fn receive_report(&mut self, report: Report, cx: &mut StateCx<'_>) {
        match &report {
            Report::DescriptorSetLayout(layout) => {
                cx.add_word(self.leaves.frame_sets, &layout.name);
                cx.activate(DescriptorOp::CreateFrameDescriptorSets);
                self.reports.push(report.clone());
                cx.forward_to_parent(report);
            }
            Report::FrameDescriptorSets(_) => {
                cx.activate(DescriptorOp::InitFrameUbos);
                cx.activate(DescriptorOp::UpdateFrameSamplers);
                self.reports.push(report);
            }
            // Routed down from the render manager; sampled ones can back samplers.
            Report::Attachment(attachment) => {
                if attachment.desc.sampled {
                    cx.add_word(self.leaves.samplers, &attachment.desc.name);
                }
            }
            _ => cx.forward_to_parent(report),
        }
    }
}

/// `<name> <binding>...` where a binding is `ubo[:stages]` or `sampler[:stages]`.
pub(crate) struct CreateLayout {
    pool: SlotPool<kinds::CreateDescriptorSetLayout>,
}

impl CreateLayout {
    pub(crate) fn new(pool: SlotPool<kinds::CreateDescriptorSetLayout>) -> Self {
        Self { pool }
    }
}

impl State for CreateLayout {
    fn name(&self) -> &'static str {
        "create_descriptor_set_layout"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn prompt(&self) -> Option<&'static str> {
        Some("descriptor set layout: <name> <ubo|sampler[:vert|frag|all]>...")
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let Some((name, bindings)) = tokens.split_first() else {
            return;
        };
        if bindings.is_empty() {
            return;
        }
        let Some(bindings) = all::<Binding>(bindings) else {
            return;
        };
        cx.submit(
            self.pool.request(|c| c.set(name, &bindings)),
            "create_descriptor_set_layout",
        );
        cx.finish(event);
    }
}

/// `<layout>...`: one frame descriptor set per layout.
pub(crate) struct CreateFrameSets {
    pool: SlotPool<kinds::CreateFrameDescriptorSets>,
}

impl CreateFrameSets {
    pub(crate) fn new(pool: SlotPool<kinds::CreateFrameDescriptorSets>) -> Self {
        Self { pool }
    }
}

impl State for CreateFrameSets {
    fn name(&self) -> &'static str {
        "create_frame_descriptor_sets"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        usage(cx, "frame descriptor sets: <layout>...");
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let layouts = tokens(event);
        if layouts.is_empty() {
            return;
        }
        cx.submit(
            self.pool.request(|c| c.set(layouts.iter().map(String::as_str))),
            "create_frame_descriptor_sets",
        );
        cx.finish(event);
    }
}

/// `<size bytes> <binding>`
pub(crate) struct InitFrameUbos {
    pool: SlotPool<kinds::AddFrameUniformBuffer>,
}

impl InitFrameUbos {
    pub(crate) fn new(pool: SlotPool<kinds::AddFrameUniformBuffer>) -> Self {
        Self { pool }
    }
}

impl State for InitFrameUbos {
    fn name(&self) -> &'static str {
        "init_frame_ubos"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn prompt(&self) -> Option<&'static str> {
        Some("frame uniform buffer: <size bytes> <binding>")
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let [size, binding] = tokens.as_slice() else {
            return;
        };
        let (Some(size), Some(binding)) = (num::<u32>(size), num::<u32>(binding)) else {
            return;
        };
        if size == 0 {
            return;
        }
        cx.submit(
            self.pool.request(|c| c.set(size, binding)),
            "add_frame_uniform_buffer",
        );
        cx.finish(event);
    }
}

/// `<binding> <attachment>...`
pub(crate) struct UpdateSamplers {
    pool: SlotPool<kinds::UpdateFrameSamplers>,
}

impl UpdateSamplers {
    pub(crate) fn new(pool: SlotPool<kinds::UpdateFrameSamplers>) -> Self {
        Self { pool }
    }
}

impl State for UpdateSamplers {
    fn name(&self) -> &'static str {
        "update_frame_samplers"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        usage(cx, "samplers: <binding> <attachment>...");
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let Some((binding, attachments)) = tokens.split_first() else {
            return;
        };
        let Some(binding) = num::<u32>(binding) else {
            return;
        };
        if attachments.is_empty() {
            return;
        }
        cx.submit(
            self.pool
                .request(|c| c.set(binding, attachments.iter().map(String::as_str))),
            "update_frame_samplers",
        );
        cx.finish(event);
    }
}

/// `<uniform index> <value>...`
pub(crate) struct BindUbo {
    pool: SlotPool<kinds::BindUboData>,
}

impl BindUbo {
    pub(crate) fn new(pool: SlotPool<kinds::BindUboData>) -> Self {
        Self { pool }
    }
}

impl State for BindUbo {
    fn name(&self) -> &'static str {
        "bind_ubo"
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn prompt(&self) -> Option<&'static str> {
        Some("bind uniform data: <index> <float>...")
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let tokens = tokens(event);
        let Some((index, values)) = tokens.split_first() else {
            return;
        };
        let (Some(index), Some(values)) = (num::<u32>(index), all::<f32>(values)) else {
            return;
        };
        if values.is_empty() {
            return;
        }
        cx.submit(self.pool.request(|c| c.set(index, &values)), "bind_ubo_data");
        cx.finish(event);
    }
}
