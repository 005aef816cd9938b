//! Chunked source reading
//!
//! Streams the delimited source file as bounded [`RawChunk`]s so the full
//! dataset is never resident in memory. Chunk boundaries are a memory
//! device only; no record's fate depends on where a chunk breaks.

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::pipeline::error::EtlResult;

/// A bounded run of raw source rows. `index` is 1-based and strictly
/// increasing over one read pass.
#[derive(Debug, Clone)]
pub struct RawChunk {
    pub index: usize,
    pub rows: Vec<StringRecord>,
}

impl RawChunk {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Streaming CSV reader producing fixed-size chunks.
pub struct ChunkReader {
    reader: Reader<File>,
    headers: StringRecord,
    chunk_size: usize,
    next_index: usize,
}

impl ChunkReader {
    /// Open the source file and read its header row. Rows shorter or
    /// longer than the header are tolerated; missing cells coerce to
    /// nulls downstream.
    pub fn open(path: &Path, chunk_size: usize) -> EtlResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let headers = reader.headers()?.clone();
        Ok(Self {
            reader,
            headers,
            chunk_size: chunk_size.max(1),
            next_index: 1,
        })
    }

    /// The raw header row, as named in the source.
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Read the next chunk, or `None` once the source is exhausted.
    pub fn next_chunk(&mut self) -> EtlResult<Option<RawChunk>> {
        let mut rows = Vec::with_capacity(self.chunk_size.min(65_536));
        while rows.len() < self.chunk_size {
            let mut record = StringRecord::new();
            if !self.reader.read_record(&mut record)? {
                break;
            }
            rows.push(record);
        }
        if rows.is_empty() {
            return Ok(None);
        }
        let chunk = RawChunk {
            index: self.next_index,
            rows,
        };
        self.next_index += 1;
        Ok(Some(chunk))
    }
}
