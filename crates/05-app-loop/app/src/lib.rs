#![deny(missing_docs)]
//! Frame loop tying producers, the state machine and the executor together.
//!
//! [`ApplicationBuilder`] assembles an [`Application`] from a renderer and an
//! [`AppConfig`]. [`Application::tick`] performs one frame; [`Application::run`]
//! starts the worker threads and ticks until shutdown.

mod application;
mod config;

pub use application::{Application, ApplicationBuilder, Inputs, DEFAULT_FRAME_INTERVAL};
pub use config::{AppConfig, RecordConfig};
