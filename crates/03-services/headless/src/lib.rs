//! Headless collaborators: a renderer that validates and records every call,
//! and a window whose native events are fed through a channel.

mod renderer;
mod window;

pub use renderer::{HeadlessRenderer, Ledger, PipelineRecord};
pub use window::{ChannelWindow, WindowFeed};
