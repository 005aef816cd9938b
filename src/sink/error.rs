//! Error types for the destination sink

use thiserror::Error;

/// Errors raised by the destination sink. All of them are fatal to a run.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Underlying database error
    #[error("database error: {0}")]
    Database(String),

    /// Destination table missing and creation was not requested
    #[error("destination table '{0}' does not exist")]
    NotInitialized(String),
}

impl SinkError {
    /// User-facing message with a recovery hint for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            SinkError::NotInitialized(table) => {
                format!(
                    "Destination table '{table}' does not exist.\n\n\
                    Hint: re-run with --create-table to create it."
                )
            }
            _ => self.to_string(),
        }
    }
}

impl From<duckdb::Error> for SinkError {
    fn from(err: duckdb::Error) -> Self {
        SinkError::Database(err.to_string())
    }
}
