use crate::edit::EditStack;
use crate::machine::Links;
use crate::node::{Node, StateId};
use crate::options::BranchOption;
use command::{Command, QueuedCommand, Report};
use event::{Category, Event};
use pool::{Pooled, Recycle};
use std::collections::VecDeque;
use telemetry::Telemetry;

/// Per-frame values read by the frame loop after `end_frame`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameState {
    draw: Option<u32>,
}

impl FrameState {
    /// Submits render command `index` every frame from now on.
    pub fn select_draw(&mut self, index: u32) {
        self.draw = Some(index);
    }

    /// Stops submitting frames.
    pub fn clear_draw(&mut self) {
        self.draw = None;
    }

    /// Render command to submit this frame.
    pub fn draw(&self) -> Option<u32> {
        self.draw
    }
}

/// What a state may touch while it handles an event, a report or a hook.
///
/// Stack changes are recorded, not applied; the machine flushes them once the
/// current handler returns.
pub struct StateCx<'a> {
    pub(crate) id: StateId,
    pub(crate) nodes: &'a mut [Node],
    pub(crate) edits: &'a mut EditStack,
    pub(crate) forwards: &'a mut VecDeque<(StateId, Report)>,
    pub(crate) frame: &'a mut FrameState,
    pub(crate) links: &'a Links,
    pub(crate) vocab_dirty: &'a mut bool,
}

impl<'a> StateCx<'a> {
    /// State being run.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Parent of the running state; `None` for the root.
    pub fn parent(&self) -> Option<StateId> {
        self.node().parent
    }

    fn node(&self) -> &Node {
        &self.nodes[self.id.index()]
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.nodes[self.id.index()]
    }

    /// Requests a push of `state`.
    pub fn push_state(&mut self, state: StateId) {
        self.edits.push(state);
    }

    /// Requests a push of `state`, then offers it `seed` as a console line.
    pub fn push_seeded(&mut self, state: StateId, seed: &str) {
        self.edits.push_seeded(state, seed);
    }

    /// Requests a pop of the top state.
    pub fn pop_self(&mut self) {
        self.edits.pop();
    }

    /// Marks `event` handled and pops. The usual ending of a leaf.
    pub fn finish(&mut self, event: &mut Event) {
        event.set_handled();
        self.pop_self();
    }

    /// Matches the first token of a console line against this branch's enabled options.
    ///
    /// Returns the option and the rest of the line.
    pub fn extract<O: BranchOption>(&self, event: &Event) -> Option<(O, String)> {
        if event.category() != Category::CommandLine {
            return None;
        }
        let word = event.first_token()?;
        let node = self.node();
        let bit = node.options.find(word, node.mask)?;
        Some((O::from_bit(bit)?, event.remainder().to_owned()))
    }

    /// Enables `op` in this branch's mask.
    pub fn activate<O: BranchOption>(&mut self, op: O) {
        let node = self.node_mut();
        if !node.mask.contains(op.bit()) {
            node.mask.set(op.bit());
            tracing::debug!(state = node.name, option = op.word(), "option enabled");
            *self.vocab_dirty = true;
        }
    }

    /// Disables `op` in this branch's mask.
    pub fn deactivate<O: BranchOption>(&mut self, op: O) {
        let node = self.node_mut();
        if node.mask.contains(op.bit()) {
            node.mask.reset(op.bit());
            *self.vocab_dirty = true;
        }
    }

    /// Whether `op` is enabled in this branch's mask.
    pub fn is_active<O: BranchOption>(&self, op: O) -> bool {
        self.node().mask.contains(op.bit())
    }

    /// Adds `word` to the completion vocabulary of `target`.
    pub fn add_word(&mut self, target: StateId, word: &str) {
        if self.nodes[target.index()].learn(word) {
            *self.vocab_dirty = true;
        }
    }

    /// Names this state has learned from reports.
    pub fn words(&self) -> &[String] {
        &self.node().words
    }

    /// Delivers `report` to `target` after the current handler returns.
    pub fn forward(&mut self, target: StateId, report: Report) {
        self.forwards.push_back((target, report));
    }

    /// Delivers `report` to this state's parent. The root has nobody to tell.
    pub fn forward_to_parent(&mut self, report: Report) {
        match self.parent() {
            Some(parent) => self.forward(parent, report),
            None => tracing::debug!(kind = report.kind().label(), "report reached the root"),
        }
    }

    /// Queues a pooled command tagged with this state as its origin.
    ///
    /// An exhausted pool (`None`) is announced and counted; nothing is queued.
    /// Returns whether the command was queued.
    pub fn submit<T: Command + Recycle>(&mut self, command: Option<Pooled<T>>, label: &str) -> bool {
        match command {
            Some(command) => {
                self.links
                    .queue
                    .push(QueuedCommand::new(Some(self.id.into()), command));
                true
            }
            None => {
                self.links.telemetry.with_stats(|s| s.commands_dropped += 1);
                tracing::warn!(command = label, "command pool exhausted");
                self.notice(&format!("too many in-flight {label} commands; dropped"));
                false
            }
        }
    }

    /// Writes an operator-visible line.
    pub fn notice(&self, line: &str) {
        self.links.notices.notice(line);
    }

    /// Shared counters.
    pub fn telemetry(&self) -> &Telemetry {
        &self.links.telemetry
    }

    /// Values the frame loop reads after `end_frame`.
    pub fn frame(&mut self) -> &mut FrameState {
        &mut *self.frame
    }
}
