use crate::node::StateId;

/// Deferred change to the state stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Push `state`; `seed` is offered to it as a console line after the flush.
    Push {
        /// State to push.
        state: StateId,
        /// Rest of the line that selected the state, if any.
        seed: Option<String>,
    },
    /// Pop the top state.
    Pop,
}

/// Edits recorded by handlers during dispatch, applied in order by the machine.
#[derive(Debug, Default)]
pub struct EditStack {
    edits: Vec<Edit>,
}

impl EditStack {
    /// Records a push without a seed.
    pub fn push(&mut self, state: StateId) {
        self.edits.push(Edit::Push { state, seed: None });
    }

    /// Records a push carrying `seed`; blank seeds are dropped.
    pub fn push_seeded(&mut self, state: StateId, seed: &str) {
        let seed = seed.trim();
        self.edits.push(Edit::Push {
            state,
            seed: (!seed.is_empty()).then(|| seed.to_owned()),
        });
    }

    /// Records a pop of the top state.
    pub fn pop(&mut self) {
        self.edits.push(Edit::Pop);
    }

    /// Removes and returns every pending edit, oldest first.
    pub fn take(&mut self) -> Vec<Edit> {
        std::mem::take(&mut self.edits)
    }

    /// Number of pending edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_preserves_order_and_empties() {
        let mut edits = EditStack::default();
        edits.push(StateId(1));
        edits.push_seeded(StateId(2), "  foo dsl0 ");
        edits.push_seeded(StateId(3), "   ");
        edits.pop();
        assert_eq!(edits.len(), 4);
        assert_eq!(
            edits.take(),
            vec![
                Edit::Push { state: StateId(1), seed: None },
                Edit::Push { state: StateId(2), seed: Some("foo dsl0".into()) },
                Edit::Push { state: StateId(3), seed: None },
                Edit::Pop,
            ]
        );
        assert!(edits.is_empty());
    }
}
