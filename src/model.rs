//! Canonical trip record types
//!
//! `NormalizedTrip` is the intermediate shape produced by the column
//! normalizer and enriched by the feature deriver; every mapped field is
//! optional until validation has run. `CanonicalTrip` is the accepted
//! record handed to the sink; fields the validator guarantees present are
//! promoted out of `Option`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The 17 canonical columns, in sink binding order.
///
/// The INSERT statement binds positionally against this list; the order
/// here is the wire order everywhere.
pub const CANONICAL_COLUMNS: [&str; 17] = [
    "pickup_datetime",
    "dropoff_datetime",
    "pickup_lat",
    "pickup_lon",
    "dropoff_lat",
    "dropoff_lon",
    "passenger_count",
    "trip_distance_km",
    "trip_duration_seconds",
    "fare_amount",
    "tip_amount",
    "trip_speed_kmh",
    "fare_per_km",
    "tip_pct",
    "hour_of_day",
    "day_of_week",
    "vendor_code",
];

/// Timestamp format used when binding datetimes to the destination table.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A trip record after column normalization, before validation.
///
/// Coercion failures surface here as `None` rather than errors; the
/// validator decides the record's fate. The derived fields are `None`
/// until the feature deriver fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTrip {
    pub pickup_datetime: Option<NaiveDateTime>,
    pub dropoff_datetime: Option<NaiveDateTime>,
    pub pickup_lat: Option<f64>,
    pub pickup_lon: Option<f64>,
    pub dropoff_lat: Option<f64>,
    pub dropoff_lon: Option<f64>,
    /// Defaults to 1 when the column is absent or the value unparseable.
    pub passenger_count: i64,
    pub trip_distance_km: Option<f64>,
    pub fare_amount: Option<f64>,
    /// The whole column defaults to `Some(0.0)` when no alias resolves; a
    /// resolved but unparseable value stays `None`.
    pub tip_amount: Option<f64>,
    pub vendor_code: Option<String>,
    // Derived fields, filled by the feature deriver.
    pub trip_duration_seconds: Option<f64>,
    pub trip_speed_kmh: Option<f64>,
    pub fare_per_km: Option<f64>,
    pub tip_pct: Option<f64>,
    pub hour_of_day: Option<u32>,
    pub day_of_week: Option<String>,
}

impl Default for NormalizedTrip {
    fn default() -> Self {
        Self {
            pickup_datetime: None,
            dropoff_datetime: None,
            pickup_lat: None,
            pickup_lon: None,
            dropoff_lat: None,
            dropoff_lon: None,
            passenger_count: 1,
            trip_distance_km: None,
            fare_amount: None,
            tip_amount: None,
            vendor_code: None,
            trip_duration_seconds: None,
            trip_speed_kmh: None,
            fare_per_km: None,
            tip_pct: None,
            hour_of_day: None,
            day_of_week: None,
        }
    }
}

/// An accepted trip record with all 17 canonical fields.
///
/// Validation guarantees timestamps, coordinates, distance, duration and
/// fare are present; the remaining derived fields stay nullable (a record
/// is acceptable even when e.g. `fare_per_km` had a zero divisor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTrip {
    pub pickup_datetime: NaiveDateTime,
    pub dropoff_datetime: NaiveDateTime,
    pub pickup_lat: f64,
    pub pickup_lon: f64,
    pub dropoff_lat: f64,
    pub dropoff_lon: f64,
    pub passenger_count: i64,
    pub trip_distance_km: f64,
    pub trip_duration_seconds: f64,
    pub fare_amount: f64,
    pub tip_amount: Option<f64>,
    pub trip_speed_kmh: Option<f64>,
    pub fare_per_km: Option<f64>,
    pub tip_pct: Option<f64>,
    pub hour_of_day: Option<u32>,
    pub day_of_week: Option<String>,
    pub vendor_code: Option<String>,
}
