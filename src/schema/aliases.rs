//! Canonical column aliases
//!
//! Each canonical input field carries an ordered candidate list; the
//! first candidate present in the header row wins and later candidates
//! are never consulted. Header comparison is case-insensitive on trimmed
//! names. The lists are plain consts so alias priority stays auditable
//! and testable in isolation.

use csv::StringRecord;

/// Pickup timestamp candidates, highest priority first.
pub const PICKUP_DATETIME_ALIASES: &[&str] = &[
    "tpep_pickup_datetime",
    "pickup_datetime",
    "pickup_time",
    "pickup_ts",
];

/// Dropoff timestamp candidates.
pub const DROPOFF_DATETIME_ALIASES: &[&str] = &[
    "tpep_dropoff_datetime",
    "dropoff_datetime",
    "dropoff_time",
    "dropoff_ts",
];

/// Pickup longitude candidates.
pub const PICKUP_LON_ALIASES: &[&str] = &["pickup_longitude", "pickup_lon", "pickup_long"];

/// Pickup latitude candidates.
pub const PICKUP_LAT_ALIASES: &[&str] =
    &["pickup_latitude", "pickup_lat", "pickup_latitude_decimal"];

/// Dropoff longitude candidates.
pub const DROPOFF_LON_ALIASES: &[&str] = &["dropoff_longitude", "dropoff_lon", "dropoff_long"];

/// Dropoff latitude candidates.
pub const DROPOFF_LAT_ALIASES: &[&str] =
    &["dropoff_latitude", "dropoff_lat", "dropoff_latitude_decimal"];

/// Trip distance candidates. Units are resolved later by the per-chunk
/// heuristic, not by the alias name.
pub const DISTANCE_ALIASES: &[&str] = &["trip_distance", "distance", "tripdistance"];

/// Fare amount candidates.
pub const FARE_ALIASES: &[&str] = &["fare_amount", "fare", "fareamount"];

/// Tip amount candidates.
pub const TIP_ALIASES: &[&str] = &["tip_amount", "tip", "tipamount"];

/// Passenger count candidates.
pub const PASSENGER_COUNT_ALIASES: &[&str] = &["passenger_count"];

/// Vendor code candidates.
pub const VENDOR_ALIASES: &[&str] = &["vendor_id", "vendor"];

/// Resolved header position for every canonical input field.
///
/// `None` means no alias matched; the normalizer substitutes the field's
/// default (or null) for every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub pickup_datetime: Option<usize>,
    pub dropoff_datetime: Option<usize>,
    pub pickup_lat: Option<usize>,
    pub pickup_lon: Option<usize>,
    pub dropoff_lat: Option<usize>,
    pub dropoff_lon: Option<usize>,
    pub trip_distance: Option<usize>,
    pub fare_amount: Option<usize>,
    pub tip_amount: Option<usize>,
    pub passenger_count: Option<usize>,
    pub vendor_code: Option<usize>,
}

impl ColumnMap {
    /// Resolve the header row against the alias table.
    pub fn resolve(headers: &StringRecord) -> Self {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let find = |aliases: &[&str]| -> Option<usize> {
            aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias))
        };

        Self {
            pickup_datetime: find(PICKUP_DATETIME_ALIASES),
            dropoff_datetime: find(DROPOFF_DATETIME_ALIASES),
            pickup_lat: find(PICKUP_LAT_ALIASES),
            pickup_lon: find(PICKUP_LON_ALIASES),
            dropoff_lat: find(DROPOFF_LAT_ALIASES),
            dropoff_lon: find(DROPOFF_LON_ALIASES),
            trip_distance: find(DISTANCE_ALIASES),
            fare_amount: find(FARE_ALIASES),
            tip_amount: find(TIP_ALIASES),
            passenger_count: find(PASSENGER_COUNT_ALIASES),
            vendor_code: find(VENDOR_ALIASES),
        }
    }

    /// Number of canonical fields that resolved to a source column.
    pub fn resolved_count(&self) -> usize {
        [
            self.pickup_datetime,
            self.dropoff_datetime,
            self.pickup_lat,
            self.pickup_lon,
            self.dropoff_lat,
            self.dropoff_lon,
            self.trip_distance,
            self.fare_amount,
            self.tip_amount,
            self.passenger_count,
            self.vendor_code,
        ]
        .iter()
        .filter(|c| c.is_some())
        .count()
    }
}
