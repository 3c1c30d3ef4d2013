use std::io;
use thiserror::Error;

/// Errors surfaced by renderer and window collaborators.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{kind} `{name}` does not exist")]
    Missing { kind: &'static str, name: String },
    #[error("{kind} `{name}` already exists")]
    Duplicate { kind: &'static str, name: String },
    #[error("{0} must happen first")]
    NotReady(&'static str),
    #[error("invalid parameters: {0}")]
    Invalid(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RenderError {
    pub fn missing(kind: &'static str, name: impl Into<String>) -> Self {
        RenderError::Missing {
            kind,
            name: name.into(),
        }
    }

    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        RenderError::Duplicate {
            kind,
            name: name.into(),
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
