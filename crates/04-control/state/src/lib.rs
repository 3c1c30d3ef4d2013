#![deny(missing_docs)]
//! Hierarchical interactive state machine.
//!
//! States live in an arena owned by [`StateMachine`] and refer to each other by
//! [`StateId`]. The machine keeps a stack of ids; events are offered from the
//! top down until one state claims them. Handlers never touch the stack
//! directly: they record pushes and pops on the [`EditStack`], which the
//! machine applies between dispatch passes.
//!
//! Three kinds of state exist:
//! * **Branch** – owns an [`OptionMap`] and an [`OptionMask`]; the first token
//!   of a console line selects an enabled option.
//! * **Leaf** – parses a console line into a command, queues it and pops.
//! * **Brief** – does its whole job on entry and is popped immediately.
//!
//! Commands report back through [`command::Report`]s. The machine routes each
//! report to the state that queued the command; leaves pass reports to their
//! parent branch, which updates sibling vocabularies and option masks.

mod cx;
mod edit;
mod machine;
mod node;
mod options;
mod reports;
pub mod states;

pub use cx::{FrameState, StateCx};
pub use edit::{Edit, EditStack};
pub use machine::{Links, MachineBuilder, State, StateMachine};
pub use node::{StateId, StateKind};
pub use options::{BranchOption, OptionMap, OptionMask};
pub use reports::ReportLog;
