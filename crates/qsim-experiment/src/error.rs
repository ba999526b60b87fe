//! Error types for the experiment crate.

use qsim_core::{ErrorKind, QsimError};
use thiserror::Error;

/// Errors produced while sampling or running experiments.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    /// Circuit construction, execution or measurement failed.
    #[error(transparent)]
    Core(#[from] QsimError),

    /// Trial or shot count must be ≥ 1.
    #[error("trials must be at least 1, got {0}")]
    InvalidTrials(usize),

    /// Worker count must be ≥ 1.
    #[error("workers must be at least 1, got {0}")]
    InvalidWorkers(usize),

    /// Trials of one experiment produced outcomes on different register sizes.
    #[error("trial outcome is on {got} qubits but the experiment records {expected}-qubit outcomes")]
    RegisterMismatch {
        /// Register size of earlier trials.
        expected: usize,
        /// Register size of the offending trial.
        got: usize,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl RunnerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunnerError::Core(err) => err.kind(),
            RunnerError::RegisterMismatch { .. } => ErrorKind::DimensionMismatch,
            RunnerError::InvalidTrials(_)
            | RunnerError::InvalidWorkers(_)
            | RunnerError::ThreadPool(_) => ErrorKind::InvalidArgument,
        }
    }
}

/// Result type for experiment operations.
pub type RunnerResult<T> = Result<T, RunnerError>;
