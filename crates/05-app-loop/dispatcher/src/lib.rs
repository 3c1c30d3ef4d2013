#![deny(missing_docs)]
//! Producer loops feeding the event queue and the consumer that drains it.
//!
//! Three producers run on their own threads and push pooled events into one
//! shared [`event::EventQueue`]:
//!
//! * [`ConsoleLoop`] – reads operator lines from a [`LineSource`].
//! * [`NativeLoop`] – translates window-system records.
//! * [`WatchLoop`] – polls watched files for modification.
//!
//! The frame loop owns a [`Dispatcher`], which drains the queue into the
//! state machine once per tick and optionally records what it saw. A
//! [`Replay`] re-injects a recorded session at a bounded rate.

mod console;
mod dispatch;
mod native;
mod producer;
mod record;
mod replay;
mod shutdown;
mod vocabulary;
mod watcher;

pub use console::{
    classify, ConsoleError, ConsoleInput, ConsoleLoop, ConsoleResult, LineSource, ReadLine,
    ScriptedLines,
};
pub use dispatch::Dispatcher;
pub use native::{category_of, NativeLoop};
pub use producer::Producer;
pub use record::{RecordTiming, Recorder};
pub use replay::{Replay, ReplayConfig};
pub use shutdown::{spawn_loop, LoopHandle, LoopStep, Shutdown};
pub use vocabulary::SharedVocabulary;
pub use watcher::{WatchLoop, DEFAULT_WATCH_INTERVAL};
