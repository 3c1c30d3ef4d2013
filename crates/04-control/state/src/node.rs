use crate::options::{OptionMap, OptionMask};
use command::Origin;

/// Index of a state in the machine's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) u32);

impl StateId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Arena position, stable for the machine's lifetime.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl From<StateId> for Origin {
    fn from(id: StateId) -> Self {
        Origin(id.0)
    }
}

/// How a state participates in dispatch and transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateKind {
    /// Menu of options; entered as soon as it is pushed.
    Branch,
    /// Parses one line into a command, then pops; entered after its push batch.
    Leaf,
    /// Acts on entry and is popped right away.
    Brief,
}

/// Machine-side bookkeeping of one state.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) name: &'static str,
    pub(crate) kind: StateKind,
    pub(crate) parent: Option<StateId>,
    pub(crate) options: OptionMap,
    pub(crate) mask: OptionMask,
    /// Object names learned from reports, offered for completion.
    pub(crate) words: Vec<String>,
    pub(crate) entered: bool,
}

impl Node {
    pub(crate) fn new(
        name: &'static str,
        kind: StateKind,
        options: OptionMap,
        mask: OptionMask,
    ) -> Self {
        Self {
            name,
            kind,
            parent: None,
            options,
            mask,
            words: Vec::new(),
            entered: false,
        }
    }

    /// Enabled option words followed by learned names.
    pub(crate) fn vocabulary(&self) -> impl Iterator<Item = &str> + '_ {
        self.options
            .active_words(self.mask)
            .map(|word| -> &str { word })
            .chain(self.words.iter().map(String::as_str))
    }

    /// Adds `word` unless already known. Returns whether it was new.
    pub(crate) fn learn(&mut self, word: &str) -> bool {
        if self.words.iter().any(|w| w == word) {
            return false;
        }
        self.words.push(word.to_owned());
        true
    }
}
