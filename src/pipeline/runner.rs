//! Pipeline runner
//!
//! Drives the full pipeline over the source: normalize, derive,
//! validate, load, audit, one chunk at a time, strictly in order. A
//! chunk's accepted rows are committed to the sink before the next chunk
//! is read, which bounds memory to a single chunk.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use super::config::EtlConfig;
use super::error::{EtlError, EtlResult};
use crate::audit::ExclusionLog;
use crate::features;
use crate::model::CanonicalTrip;
use crate::progress::{EtlProgress, format_number};
use crate::schema::{ColumnMap, normalize_chunk};
use crate::sink::{SinkError, TripSink};
use crate::source::ChunkReader;
use crate::validate::{self, Rejection};

/// Summary of one processed chunk.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkSummary {
    pub index: usize,
    pub rows_read: usize,
    pub rows_loaded: usize,
    pub rows_excluded: usize,
    /// First rejected record's reasons, empty when nothing was excluded.
    pub sample_reason: String,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub rows_read: u64,
    pub rows_loaded: u64,
    pub rows_excluded: u64,
    pub chunks: Vec<ChunkSummary>,
    pub duration_ms: u64,
    pub exclusion_log: PathBuf,
}

impl RunReport {
    fn new(run_id: String, exclusion_log: PathBuf) -> Self {
        Self {
            run_id,
            rows_read: 0,
            rows_loaded: 0,
            rows_excluded: 0,
            chunks: Vec::new(),
            duration_ms: 0,
            exclusion_log,
        }
    }

    /// Get formatted duration.
    pub fn duration_formatted(&self) -> String {
        let secs = self.duration_ms / 1000;
        let mins = secs / 60;
        let remaining_secs = secs % 60;

        if mins > 0 {
            format!("{}m {}s", mins, remaining_secs)
        } else {
            format!("{}s", secs)
        }
    }

    /// Print the run-wide summary to stderr.
    pub fn print_summary(&self) {
        eprintln!();
        eprintln!("ETL complete.");
        eprintln!("  Rows read:     {}", format_number(self.rows_read));
        eprintln!("  Rows loaded:   {}", format_number(self.rows_loaded));
        eprintln!("  Rows excluded: {}", format_number(self.rows_excluded));
        eprintln!("  Chunks:        {}", self.chunks.len());
        eprintln!("  Duration:      {}", self.duration_formatted());
        eprintln!("  Exclusion log: {}", self.exclusion_log.display());
    }
}

/// Pipeline runner executing one configured ETL pass.
pub struct EtlRunner {
    config: EtlConfig,
}

impl EtlRunner {
    /// Create a runner, validating the configuration.
    pub fn new(config: EtlConfig) -> EtlResult<Self> {
        config.validate().map_err(EtlError::Config)?;
        Ok(Self { config })
    }

    /// The runner's configuration.
    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Run the pipeline to completion.
    ///
    /// Any sink or audit failure aborts the run; sub-batches already
    /// committed stay committed, so an aborted run leaves a loaded prefix
    /// in the destination.
    pub fn run(&self) -> EtlResult<RunReport> {
        let run_id = Uuid::new_v4().to_string();
        let _span = info_span!(
            "etl_run",
            run_id = %run_id,
            input = %self.config.input.display()
        )
        .entered();
        let start = Instant::now();

        // Destination first: a connection or schema failure must surface
        // before any chunk is read.
        let mut sink = TripSink::open(&self.config.database.display().to_string())?;
        if self.config.create_table {
            sink.ensure_schema(&self.config.table)?;
        } else if !sink.is_initialized(&self.config.table)? {
            return Err(SinkError::NotInitialized(self.config.table.clone()).into());
        }

        let mut log = ExclusionLog::open(&self.config.exclusion_log)?;
        let mut reader = ChunkReader::open(&self.config.input, self.config.chunk_size)?;

        let columns = ColumnMap::resolve(reader.headers());
        if columns.resolved_count() == 0 {
            warn!(
                input = %self.config.input.display(),
                "No source column matched any canonical field; every row will be excluded"
            );
        }

        let progress = if self.config.quiet {
            EtlProgress::hidden()
        } else {
            EtlProgress::new()
        };

        let mut report = RunReport::new(run_id, self.config.exclusion_log.clone());

        while let Some(chunk) = reader.next_chunk()? {
            let chunk_index = chunk.index;
            let rows_read = chunk.len();
            progress.start_chunk(chunk_index, rows_read);

            let mut accepted: Vec<CanonicalTrip> = Vec::new();
            let mut rejections: Vec<Rejection> = Vec::new();
            for mut trip in normalize_chunk(&columns, &chunk) {
                features::derive(&mut trip);
                match validate::validate(trip) {
                    Ok(trip) => accepted.push(trip),
                    Err(rejection) => rejections.push(rejection),
                }
            }

            let inserted = match sink.insert_batch(&self.config.table, &accepted, self.config.batch_size) {
                Ok(inserted) => inserted,
                Err(e) => {
                    progress.finish_error(&format!("chunk {chunk_index} failed to load"));
                    return Err(e.into());
                }
            };

            let sample_reason = rejections
                .first()
                .map(Rejection::reason_string)
                .unwrap_or_default();
            log.append(chunk_index, rejections.len(), &sample_reason)?;

            report.rows_read += rows_read as u64;
            report.rows_loaded += inserted as u64;
            report.rows_excluded += rejections.len() as u64;
            progress.update_totals(report.rows_read, report.rows_loaded, report.rows_excluded);

            info!(
                chunk = chunk_index,
                read = rows_read,
                cleaned = accepted.len(),
                inserted,
                excluded = rejections.len(),
                "Chunk processed"
            );

            report.chunks.push(ChunkSummary {
                index: chunk_index,
                rows_read,
                rows_loaded: inserted,
                rows_excluded: rejections.len(),
                sample_reason,
            });
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        progress.finish_success(&format!(
            "{} rows loaded, {} excluded",
            format_number(report.rows_loaded),
            format_number(report.rows_excluded)
        ));

        info!(
            rows_read = report.rows_read,
            rows_loaded = report.rows_loaded,
            rows_excluded = report.rows_excluded,
            duration_ms = report.duration_ms,
            "Run complete"
        );

        Ok(report)
    }
}
