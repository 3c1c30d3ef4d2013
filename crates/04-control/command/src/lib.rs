//! Commands, the queue that carries them, and the thread that runs them.
//!
//! States on the dispatch thread turn parsed input into pooled commands and
//! push them onto the [`CommandQueue`]. The [`Executor`] drains the queue on a
//! fixed cadence, runs each command against the [`render_abi::Renderer`] and,
//! on success, lets the command publish a [`Report`] back to the state that
//! issued it.

mod command;
mod error;
mod executor;
pub mod kinds;
mod pools;
mod queue;
mod report;

pub use command::{Command, Completed, ExecCx, Origin, QueuedCommand};
pub use error::{CommandError, CommandResult};
pub use executor::{Executor, ExecutorHandle, DEFAULT_EXEC_INTERVAL};
pub use pools::{CommandPools, PoolCapacities, MAX_POOL_CAPACITY};
pub use queue::CommandQueue;
pub use report::{
    AttachmentReport, DescriptorSetLayoutReport, FrameDescriptorSetsReport,
    GraphicsPipelineReport, PipelineLayoutReport, RenderCommandReport, RenderLayerReport,
    RenderPassReport, Report, ReportKind, ShaderReport, WindowReport,
};
