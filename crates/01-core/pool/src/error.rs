use thiserror::Error;

/// Errors raised while building a pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// A pool must hold at least one slot.
    #[error("pool `{label}` requested with zero capacity")]
    ZeroCapacity {
        /// Pool label.
        label: &'static str,
    },
}

/// Convenience alias for pool construction results.
pub type PoolResult<T> = Result<T, PoolError>;
