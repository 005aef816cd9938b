//! Pipeline error types

use thiserror::Error;

use crate::audit::AuditError;
use crate::sink::SinkError;

/// Result alias for pipeline operations.
pub type EtlResult<T> = Result<T, EtlError>;

/// Fatal errors for a pipeline run.
///
/// Row-level defects never appear here; they are resolved into rejection
/// reasons and the run continues.
#[derive(Error, Debug)]
pub enum EtlError {
    /// Invalid run configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Source IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Destination sink error
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Exclusion log error
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl EtlError {
    /// User-facing message with recovery hints where available.
    pub fn user_message(&self) -> String {
        match self {
            EtlError::Sink(e) => e.user_message(),
            EtlError::Config(msg) => {
                format!("Invalid configuration: {msg}")
            }
            _ => self.to_string(),
        }
    }
}
