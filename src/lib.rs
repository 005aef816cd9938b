//! Trip-record ETL: normalize heterogeneous trip datasets into a
//! canonical relational table with an auditable exclusion trail.
//!
//! The pipeline reads a delimited source in bounded chunks, maps variant
//! column names onto a canonical field set, corrects distance units via a
//! per-chunk population heuristic, derives analytic features, validates
//! each record against domain rules (accumulating every applicable
//! rejection reason), loads accepted records into an embedded DuckDB
//! table in transactional sub-batches, and appends one audit row per
//! chunk to the exclusion log.
//!
//! Processing is single-threaded and strictly sequential: chunk *n*'s
//! accepted rows are committed before chunk *n+1* is read. Row-level
//! defects never abort a run; sink and audit defects always do.

pub mod audit;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod schema;
pub mod sink;
pub mod source;
pub mod validate;

// Re-export commonly used types
pub use audit::{AuditError, ExclusionLog};
pub use model::{CANONICAL_COLUMNS, CanonicalTrip, NormalizedTrip};
pub use pipeline::{ChunkSummary, EtlConfig, EtlError, EtlResult, EtlRunner, RunReport};
pub use schema::ColumnMap;
pub use sink::{SinkError, TripSink};
pub use source::{ChunkReader, RawChunk};
pub use validate::{ExclusionReason, Rejection};
