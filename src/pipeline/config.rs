//! Run configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default rows per source chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 200_000;

/// Default rows per insert sub-batch.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Default destination table name.
pub const DEFAULT_TABLE: &str = "trips";

/// Default exclusion log location.
pub const DEFAULT_EXCLUSION_LOG: &str = "cleaning_log.csv";

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Source CSV path
    pub input: PathBuf,
    /// Destination database path
    pub database: PathBuf,
    /// Destination table name
    pub table: String,
    /// Create the destination table if absent
    pub create_table: bool,
    /// Rows read per chunk
    pub chunk_size: usize,
    /// Rows per insert sub-batch (one transaction each)
    pub batch_size: usize,
    /// Exclusion log path
    pub exclusion_log: PathBuf,
    /// Suppress progress bars
    pub quiet: bool,
}

impl EtlConfig {
    /// Create a config with defaults for everything but the two required
    /// paths.
    pub fn new(input: impl Into<PathBuf>, database: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            database: database.into(),
            table: DEFAULT_TABLE.to_string(),
            create_table: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            exclusion_log: PathBuf::from(DEFAULT_EXCLUSION_LOG),
            quiet: false,
        }
    }

    /// Set the destination table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Create the destination table if absent.
    pub fn with_create_table(mut self, create_table: bool) -> Self {
        self.create_table = create_table;
        self
    }

    /// Set the rows read per chunk.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the rows per insert sub-batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the exclusion log path.
    pub fn with_exclusion_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclusion_log = path.into();
        self
    }

    /// Suppress progress bars.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk size must be positive".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch size must be positive".to_string());
        }
        if !valid_table_name(&self.table) {
            return Err(format!(
                "invalid table name '{}': use letters, digits and underscores, starting with a letter or underscore",
                self.table
            ));
        }
        Ok(())
    }
}

/// Table names are interpolated into DDL, so restrict them to identifier
/// characters.
fn valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
