//! Destination sink
//!
//! Persists accepted canonical trips into an embedded DuckDB database.
//! Inserts run in bounded sub-batches, one transaction per sub-batch. A
//! failed sub-batch aborts the run and earlier commits stay, so across a
//! failed run the destination holds a committed prefix (at-least-once
//! semantics); exact reload means re-running against a truncated table.

pub mod error;
pub mod schema;

pub use error::SinkError;
pub use schema::TripSchema;

use duckdb::Connection;

use crate::model::{CanonicalTrip, SQL_DATETIME_FORMAT};

/// Destination database handle for canonical trips.
pub struct TripSink {
    conn: Connection,
    path: Option<String>,
}

impl TripSink {
    /// Open or create the destination database at the given path.
    pub fn open(path: &str) -> Result<Self, SinkError> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory destination (for testing).
    pub fn memory() -> Result<Self, SinkError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// The database path (if not in-memory).
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Create the destination table, id sequence and indexes when absent.
    /// Idempotent; safe to call on every run.
    pub fn ensure_schema(&self, table: &str) -> Result<(), SinkError> {
        self.conn.execute_batch(&TripSchema::create_table(table))?;
        Ok(())
    }

    /// Check whether the destination table exists.
    pub fn is_initialized(&self, table: &str) -> Result<bool, SinkError> {
        let result: Result<i32, _> = self.conn.query_row(
            "SELECT 1 FROM information_schema.tables WHERE table_name = ?1",
            [table],
            |row| row.get(0),
        );
        match result {
            Ok(_) => Ok(true),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert accepted trips in sub-batches of `sub_batch_size` rows, one
    /// transaction per sub-batch, binding the 17 canonical fields
    /// positionally. Returns the number of rows inserted.
    pub fn insert_batch(
        &mut self,
        table: &str,
        trips: &[CanonicalTrip],
        sub_batch_size: usize,
    ) -> Result<usize, SinkError> {
        if trips.is_empty() {
            return Ok(0);
        }
        let sql = TripSchema::insert_trip(table);
        let sub_batch_size = sub_batch_size.max(1);
        let mut inserted = 0;
        for sub_batch in trips.chunks(sub_batch_size) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare(&sql)?;
                for trip in sub_batch {
                    stmt.execute(duckdb::params![
                        trip.pickup_datetime.format(SQL_DATETIME_FORMAT).to_string(),
                        trip.dropoff_datetime.format(SQL_DATETIME_FORMAT).to_string(),
                        trip.pickup_lat,
                        trip.pickup_lon,
                        trip.dropoff_lat,
                        trip.dropoff_lon,
                        trip.passenger_count,
                        trip.trip_distance_km,
                        trip.trip_duration_seconds,
                        trip.fare_amount,
                        trip.tip_amount,
                        trip.trip_speed_kmh,
                        trip.fare_per_km,
                        trip.tip_pct,
                        trip.hour_of_day.map(|h| h as i32),
                        trip.day_of_week.as_deref(),
                        trip.vendor_code.as_deref(),
                    ])?;
                }
            }
            tx.commit()?;
            inserted += sub_batch.len();
        }
        Ok(inserted)
    }

    /// Row count in the destination table.
    pub fn count(&self, table: &str) -> Result<i64, SinkError> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }
}
