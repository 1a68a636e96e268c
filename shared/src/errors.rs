//! Error types for the Peso Coach engine

use thiserror::Error;

/// Engine error types
///
/// Missing or insufficient data is never an error: those paths return
/// `None`. These variants cover configuration bugs and malformed writes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid moving-average window: {0} (must be at least 1)")]
    InvalidWindow(usize),

    #[error("Invalid projection parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid day log: {0}")]
    InvalidLog(String),

    #[error("Invalid month key: {0}")]
    InvalidMonth(String),
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
