use crate::cx::{FrameState, StateCx};
use crate::edit::{Edit, EditStack};
use crate::node::{Node, StateId, StateKind};
use crate::options::{OptionMap, OptionMask};
use command::{CommandQueue, Completed, Report};
use event::{Category, Event};
use std::collections::VecDeque;
use telemetry::{Notices, Telemetry};

/// Upper bound on report deliveries per routing pass; stops forwarding cycles.
const MAX_REPORT_HOPS: usize = 256;

/// Collaborators every state reaches through its [`StateCx`].
#[derive(Clone)]
pub struct Links {
    /// Where states queue commands.
    pub queue: CommandQueue,
    /// Operator-visible output.
    pub notices: Notices,
    /// Shared counters.
    pub telemetry: Telemetry,
    /// Echo console lines no state recognized.
    pub announce_unrecognized: bool,
}

/// Behaviour of one node in the state tree.
pub trait State: Send {
    /// Name used in logs and stack dumps.
    fn name(&self) -> &'static str;

    /// Dispatch and transition role.
    fn kind(&self) -> StateKind;

    /// Option table and the options enabled at start. Branches only.
    fn options(&self) -> (OptionMap, OptionMask) {
        (OptionMap::default(), OptionMask::empty())
    }

    /// Line shown to the operator when the state is entered.
    fn prompt(&self) -> Option<&'static str> {
        None
    }

    /// Offered every event while on the stack; set `handled` to stop propagation.
    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>);

    /// Runs when the state becomes active.
    fn on_enter(&mut self, cx: &mut StateCx<'_>) {
        if let Some(prompt) = self.prompt() {
            cx.notice(prompt);
        }
    }

    /// Runs just before the state is popped.
    fn on_exit(&mut self, _cx: &mut StateCx<'_>) {}

    /// Receives a report routed to this state. Passes it to the parent by default.
    fn receive_report(&mut self, report: Report, cx: &mut StateCx<'_>) {
        cx.forward_to_parent(report);
    }

    /// A child of this state was popped.
    fn child_exited(&mut self, _child: StateId, _cx: &mut StateCx<'_>) {}

    /// Start of a frame tick, bottom of the stack first.
    fn begin_frame(&mut self, _cx: &mut StateCx<'_>) {}

    /// End of a frame tick, bottom of the stack first.
    fn end_frame(&mut self, _cx: &mut StateCx<'_>) {}
}

/// Collects states into an arena and wires parents before the machine starts.
pub struct MachineBuilder {
    states: Vec<Box<dyn State>>,
    nodes: Vec<Node>,
    links: Links,
}

impl MachineBuilder {
    /// Empty arena sharing `links` with every state.
    pub fn new(links: Links) -> Self {
        Self {
            states: Vec::new(),
            nodes: Vec::new(),
            links,
        }
    }

    /// Adds `state` to the arena and returns its id.
    pub fn add(&mut self, state: impl State + 'static) -> StateId {
        let id = StateId(self.states.len() as u32);
        let (options, mask) = state.options();
        self.nodes
            .push(Node::new(state.name(), state.kind(), options, mask));
        self.states.push(Box::new(state));
        id
    }

    /// Makes `parent` the parent of every state in `children`.
    pub fn adopt(&mut self, parent: StateId, children: &[StateId]) {
        for child in children {
            self.nodes[child.index()].parent = Some(parent);
        }
    }

    /// Starts the machine with `root` as the only stacked state, entered.
    pub fn build(self, root: StateId) -> StateMachine {
        let mut machine = StateMachine {
            states: self.states,
            nodes: self.nodes,
            stack: vec![root],
            edits: EditStack::default(),
            forwards: VecDeque::new(),
            frame: FrameState::default(),
            links: self.links,
            vocab_dirty: true,
        };
        machine.enter(root);
        machine.flush_edits();
        machine
    }
}

/// Stack of states over an arena, driven by the dispatch thread.
pub struct StateMachine {
    states: Vec<Box<dyn State>>,
    nodes: Vec<Node>,
    stack: Vec<StateId>,
    edits: EditStack,
    forwards: VecDeque<(StateId, Report)>,
    frame: FrameState,
    links: Links,
    vocab_dirty: bool,
}

impl StateMachine {
    fn with_state<R>(
        &mut self,
        id: StateId,
        f: impl FnOnce(&mut dyn State, &mut StateCx<'_>) -> R,
    ) -> R {
        let state = &mut self.states[id.index()];
        let mut cx = StateCx {
            id,
            nodes: &mut self.nodes,
            edits: &mut self.edits,
            forwards: &mut self.forwards,
            frame: &mut self.frame,
            links: &self.links,
            vocab_dirty: &mut self.vocab_dirty,
        };
        f(state.as_mut(), &mut cx)
    }

    /// Offers `event` to the stack, top first, until a state handles it.
    ///
    /// Abort is consumed by the topmost non-root state, which pops. Returns
    /// whether the event was handled. Stack edits are not applied; call
    /// [`flush_edits`](Self::flush_edits).
    pub fn dispatch(&mut self, event: &mut Event) -> bool {
        self.links.telemetry.with_stats(|s| s.events_dispatched += 1);
        if event.category() == Category::Abort {
            if self.stack.len() > 1 {
                if let Some(&top) = self.stack.last() {
                    tracing::debug!(state = self.nodes[top.index()].name, "aborted");
                    self.with_state(top, |_, cx| cx.pop_self());
                    event.set_handled();
                }
            }
        } else {
            for pos in (0..self.stack.len()).rev() {
                let id = self.stack[pos];
                self.with_state(id, |state, cx| state.handle_event(event, cx));
                if event.is_handled() {
                    break;
                }
            }
        }
        if !event.is_handled() {
            self.unhandled(event);
        }
        self.route_reports();
        event.is_handled()
    }

    fn unhandled(&self, event: &Event) {
        self.links.telemetry.with_stats(|s| s.events_unhandled += 1);
        if let Some(text) = event.text() {
            tracing::debug!(line = text, "unrecognized input");
            if self.links.announce_unrecognized {
                self.links.notices.notice(&format!("unrecognized: {text}"));
            }
        }
    }

    /// Applies recorded stack edits until none remain.
    ///
    /// Branches are entered as they are pushed. Leaves pushed in the same
    /// batch are entered afterwards in push order. Brief states act on entry
    /// and are popped at once. Seeds are offered to their state once the batch
    /// is applied, if it is still on top.
    pub fn flush_edits(&mut self) {
        while !self.edits.is_empty() {
            let mut leaves = Vec::new();
            let mut seeds = Vec::new();
            for edit in self.edits.take() {
                match edit {
                    Edit::Push { state, seed } => {
                        if self.stack.contains(&state) {
                            tracing::debug!(state = self.nodes[state.index()].name, "already stacked");
                            continue;
                        }
                        self.stack.push(state);
                        tracing::debug!(state = self.nodes[state.index()].name, "pushed");
                        match self.nodes[state.index()].kind {
                            StateKind::Leaf => leaves.push(state),
                            StateKind::Branch => self.enter(state),
                            StateKind::Brief => {
                                self.enter(state);
                                self.pop_top();
                            }
                        }
                        if let Some(seed) = seed {
                            seeds.push((state, seed));
                        }
                    }
                    Edit::Pop => self.pop_top(),
                }
            }
            for leaf in leaves {
                if self.stack.contains(&leaf) && !self.nodes[leaf.index()].entered {
                    self.enter(leaf);
                }
            }
            if let Some(&top) = self.stack.last() {
                if !self.nodes[top.index()].entered {
                    self.enter(top);
                }
            }
            for (state, seed) in seeds {
                if self.stack.last() != Some(&state) {
                    tracing::debug!(state = self.nodes[state.index()].name, "seed dropped");
                    continue;
                }
                let mut event = Event::command_line(&seed);
                self.with_state(state, |s, cx| s.handle_event(&mut event, cx));
                if !event.is_handled() {
                    self.unhandled(&event);
                }
            }
            self.route_reports();
        }
    }

    fn enter(&mut self, id: StateId) {
        self.nodes[id.index()].entered = true;
        self.vocab_dirty = true;
        tracing::debug!(state = self.nodes[id.index()].name, "entered");
        self.with_state(id, |state, cx| state.on_enter(cx));
    }

    fn pop_top(&mut self) {
        if self.stack.len() <= 1 {
            tracing::warn!("pop of the root state ignored");
            return;
        }
        let Some(&top) = self.stack.last() else {
            return;
        };
        self.with_state(top, |state, cx| state.on_exit(cx));
        self.stack.pop();
        self.nodes[top.index()].entered = false;
        self.vocab_dirty = true;
        tracing::debug!(state = self.nodes[top.index()].name, "popped");
        if let Some(parent) = self.nodes[top.index()].parent {
            self.with_state(parent, |state, cx| state.child_exited(top, cx));
        }
    }

    /// Routes a completed command's report to the state that issued it.
    pub fn absorb(&mut self, completed: Completed) {
        let id = StateId(completed.origin.0);
        if id.index() >= self.states.len() {
            tracing::warn!(origin = completed.origin.0, "report for unknown state dropped");
            return;
        }
        self.deliver(id, completed.report);
    }

    /// Hands `report` to `target` and follows any forwards it causes.
    pub fn deliver(&mut self, target: StateId, report: Report) {
        self.forwards.push_back((target, report));
        self.route_reports();
        self.flush_edits();
    }

    fn route_reports(&mut self) {
        let mut hops = 0;
        while let Some((target, report)) = self.forwards.pop_front() {
            hops += 1;
            if hops > MAX_REPORT_HOPS {
                tracing::warn!(pending = self.forwards.len() + 1, "report forwarding cycle cut");
                self.forwards.clear();
                return;
            }
            self.links.telemetry.with_stats(|s| s.reports_routed += 1);
            tracing::debug!(
                state = self.nodes[target.index()].name,
                kind = report.kind().label(),
                "report routed"
            );
            self.with_state(target, |state, cx| state.receive_report(report, cx));
        }
    }

    /// Runs `begin_frame` on every stacked state, bottom first.
    pub fn begin_frame(&mut self) {
        for pos in 0..self.stack.len() {
            let id = self.stack[pos];
            self.with_state(id, |state, cx| state.begin_frame(cx));
        }
        self.route_reports();
    }

    /// Runs `end_frame` on every stacked state, bottom first, then flushes.
    pub fn end_frame(&mut self) {
        for pos in 0..self.stack.len() {
            let id = self.stack[pos];
            self.with_state(id, |state, cx| state.end_frame(cx));
        }
        self.route_reports();
        self.flush_edits();
    }

    /// Values states set for the frame loop.
    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    /// Completion words of every entered state, bottom of the stack first.
    pub fn vocabulary(&self) -> Vec<String> {
        let mut words: Vec<String> = Vec::new();
        for id in &self.stack {
            let node = &self.nodes[id.index()];
            if !node.entered {
                continue;
            }
            for word in node.vocabulary() {
                if !words.iter().any(|w| w == word) {
                    words.push(word.to_owned());
                }
            }
        }
        words
    }

    /// The vocabulary, if it may have changed since the last call.
    pub fn take_vocabulary_change(&mut self) -> Option<Vec<String>> {
        if !std::mem::take(&mut self.vocab_dirty) {
            return None;
        }
        Some(self.vocabulary())
    }

    /// Names of the stacked states, bottom first.
    pub fn stack_names(&self) -> Vec<&'static str> {
        self.stack
            .iter()
            .map(|id| self.nodes[id.index()].name)
            .collect()
    }

    /// Top of the stack.
    pub fn top(&self) -> Option<StateId> {
        self.stack.last().copied()
    }

    /// First state registered under `name`.
    pub fn id_of(&self, name: &str) -> Option<StateId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| StateId(i as u32))
    }

    /// Whether `id` has been entered and not exited since.
    pub fn is_entered(&self, id: StateId) -> bool {
        self.nodes[id.index()].entered
    }

    /// Names `id` has learned from reports.
    pub fn words(&self, id: StateId) -> &[String] {
        &self.nodes[id.index()].words
    }

    /// Enabled option words of `id`.
    pub fn active_options(&self, id: StateId) -> Vec<&'static str> {
        let node = &self.nodes[id.index()];
        node.options.active_words(node.mask).collect()
    }

    /// Number of states in the arena.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True for an empty arena, which `build` never produces.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
