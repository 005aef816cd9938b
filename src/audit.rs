//! Exclusion audit log
//!
//! One row per processed chunk, appended to a durable CSV file:
//! `chunk_index, excluded_count, sample_reason`. The header is written
//! only when the file is created; prior entries are never rewritten or
//! truncated. This is a diagnostic trail; it is never consulted to
//! resume a run.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by the exclusion log. Fatal to a run.
#[derive(Error, Debug)]
pub enum AuditError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only audit log of per-chunk exclusions.
pub struct ExclusionLog {
    path: PathBuf,
}

impl ExclusionLog {
    /// Open the log at `path`, creating parent directories and writing
    /// the header row only when the file does not already exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        if !path.exists() {
            let file = OpenOptions::new().create_new(true).write(true).open(&path)?;
            let mut writer = csv::Writer::from_writer(file);
            writer.write_record(["chunk_index", "excluded_count", "sample_reason"])?;
            writer.flush()?;
        }
        Ok(Self { path })
    }

    /// The log file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one audit row. Flushes before returning so a later abort
    /// cannot lose rows for chunks that already completed.
    pub fn append(
        &mut self,
        chunk_index: usize,
        excluded_count: usize,
        sample_reason: &str,
    ) -> Result<(), AuditError> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record([
            chunk_index.to_string(),
            excluded_count.to_string(),
            sample_reason.to_string(),
        ])?;
        writer.flush()?;
        Ok(())
    }
}
