use pool::PoolError;
use render_abi::RenderError;
use thiserror::Error;

/// Errors raised while building pools or running commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("{0} was queued without a name")]
    Unnamed(&'static str),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("pool `{label}` capacity {requested} is outside 1..={max}")]
    Capacity {
        label: &'static str,
        requested: usize,
        max: usize,
    },
}

pub type CommandResult<T> = Result<T, CommandError>;
