//! Progress reporting for pipeline runs
//!
//! Spinner-based progress via the `indicatif` crate: total row counts are
//! unknown until the source is exhausted, so the display uses message
//! spinners rather than bounded bars.

use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress reporter for one ETL run.
pub struct EtlProgress {
    multi: MultiProgress,
    chunks_bar: ProgressBar,
    rows_bar: ProgressBar,
}

impl EtlProgress {
    /// Create a visible progress reporter.
    pub fn new() -> Self {
        let multi = MultiProgress::new();

        let chunks_bar = multi.add(ProgressBar::new_spinner());
        chunks_bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}").unwrap(),
        );
        chunks_bar.set_message("Waiting for first chunk");
        chunks_bar.enable_steady_tick(Duration::from_millis(100));

        let rows_bar = multi.add(ProgressBar::new_spinner());
        rows_bar.set_style(ProgressStyle::with_template("{spinner:.yellow} {msg}").unwrap());
        rows_bar.set_message("Rows: 0 read, 0 loaded, 0 excluded");
        rows_bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            multi,
            chunks_bar,
            rows_bar,
        }
    }

    /// Hidden reporter for quiet mode; every update is a no-op.
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::new(),
            chunks_bar: ProgressBar::hidden(),
            rows_bar: ProgressBar::hidden(),
        }
    }

    /// The multi-progress handle, for attaching additional bars.
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }

    /// Announce a chunk that just came off the reader.
    pub fn start_chunk(&self, index: usize, rows: usize) {
        self.chunks_bar.set_message(format!(
            "Chunk {index}: {} rows read",
            format_number(rows as u64)
        ));
    }

    /// Refresh the running totals line.
    pub fn update_totals(&self, read: u64, loaded: u64, excluded: u64) {
        self.rows_bar.set_message(format!(
            "Rows: {} read, {} loaded, {} excluded",
            format_number(read),
            format_number(loaded),
            format_number(excluded)
        ));
    }

    /// Finish with a success message.
    pub fn finish_success(&self, msg: &str) {
        self.chunks_bar.finish_with_message(format!("✓ {msg}"));
        self.rows_bar.finish_and_clear();
    }

    /// Finish with an error message.
    pub fn finish_error(&self, msg: &str) {
        self.chunks_bar.abandon_with_message(format!("✗ {msg}"));
        self.rows_bar.finish_and_clear();
    }
}

impl Default for EtlProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
