//! Error types for engine operations.

use thiserror::Error;

/// Errors produced by engine components.
///
/// There are no recoverable runtime errors in normal operation: the taxonomy
/// is configuration validity and invariant violation. Invariant variants
/// indicate a defect in the scheduler/lifecycle coupling and are treated as
/// fatal in tests rather than swallowed.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration rejected at setup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A core index outside the configured pool was referenced.
    #[error("core index {0} out of range")]
    CoreOutOfRange(usize),
    /// A core was released while no task occupied it.
    #[error("core {0} released while vacant")]
    ReleaseVacant(usize),
    /// An event referenced a task that is not in the live table.
    #[error("unknown task {0}")]
    UnknownTask(u64),
    /// A cross-component invariant no longer holds.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
