//! Destination schema DDL

use crate::model::CANONICAL_COLUMNS;

/// DDL and statement provider for the destination trips table.
pub struct TripSchema;

impl TripSchema {
    /// DDL for the destination table, its id sequence and secondary
    /// indexes (DuckDB syntax). Every statement is IF NOT EXISTS, so the
    /// batch is safe to execute on every run.
    pub fn create_table(table: &str) -> String {
        format!(
            r#"
-- Surrogate key sequence
CREATE SEQUENCE IF NOT EXISTS {table}_id_seq START 1;

-- Canonical trips table
CREATE TABLE IF NOT EXISTS {table} (
    id BIGINT PRIMARY KEY DEFAULT nextval('{table}_id_seq'),
    vendor_code VARCHAR,
    pickup_datetime TIMESTAMP NOT NULL,
    dropoff_datetime TIMESTAMP NOT NULL,
    pickup_lat DOUBLE,
    pickup_lon DOUBLE,
    dropoff_lat DOUBLE,
    dropoff_lon DOUBLE,
    passenger_count INTEGER,
    trip_distance_km DOUBLE,
    trip_duration_seconds DOUBLE,
    fare_amount DOUBLE,
    tip_amount DOUBLE,
    trip_speed_kmh DOUBLE,
    fare_per_km DOUBLE,
    tip_pct DOUBLE,
    hour_of_day TINYINT,
    day_of_week VARCHAR
);

-- Indexes for the downstream query layer
CREATE INDEX IF NOT EXISTS idx_{table}_pickup_datetime ON {table}(pickup_datetime);
CREATE INDEX IF NOT EXISTS idx_{table}_hour_of_day ON {table}(hour_of_day);
CREATE INDEX IF NOT EXISTS idx_{table}_fare_amount ON {table}(fare_amount);
"#
        )
    }

    /// Positional INSERT over the 17 canonical columns, in canonical
    /// order.
    pub fn insert_trip(table: &str) -> String {
        let columns = CANONICAL_COLUMNS.join(", ");
        let placeholders = (1..=CANONICAL_COLUMNS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})")
    }
}
