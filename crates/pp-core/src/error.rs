//! Configuration error type.
//!
//! The protocol itself has no error states; everything that can go wrong is
//! caught here, before any agent is created or any worker is started.
//! Downstream crates wrap `PpError` as one variant of their own enums.

use thiserror::Error;

use crate::Strategy;

/// The top-level error type for `pp-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PpError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("population of {size} agents cannot fill {buckets} strategy buckets")]
    PopulationTooSmall { size: usize, buckets: usize },

    #[error("strategy {strategy} has a non-zero proportion but rounds to 0 of {size} agents")]
    EmptyStrategy { strategy: Strategy, size: usize },
}

/// Shorthand result type for all `pp-*` crates.
pub type PpResult<T> = Result<T, PpError>;
