#![deny(missing_docs)]
//! Input events and the shared queue that carries them to the dispatch loop.
//!
//! * [`Event`] – category, handled flag and payload of one input occurrence.
//! * [`EventPools`] – one fixed-capacity [`pool::SlotPool`] per [`Category`].
//! * [`EventQueue`] – multi-producer, single-consumer FIFO of pooled events.
//! * [`log`] – append-only binary event log used for record and replay.
//! * [`WatchList`] – paths whose modification times the watcher polls.

mod event;
pub mod log;
mod pools;
mod queue;
mod watch;

pub use event::{Category, Event, Key, MouseButton, Payload};
pub use pools::{EventHandle, EventPools, DEFAULT_EVENT_CAPACITY};
pub use queue::EventQueue;
pub use watch::WatchList;
