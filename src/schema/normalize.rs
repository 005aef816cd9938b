//! Chunk normalization
//!
//! Maps raw rows onto [`NormalizedTrip`] through a resolved [`ColumnMap`],
//! coercing cells leniently: anything unparseable becomes a null field for
//! the validator to judge. Distance units are corrected per chunk via a
//! population heuristic.

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use once_cell::sync::Lazy;
use regex::Regex;

use super::aliases::ColumnMap;
use crate::model::NormalizedTrip;
use crate::source::RawChunk;

/// Miles to kilometres.
pub const MILES_TO_KM: f64 = 1.60934;

/// A chunk mean below this is consistent with mile-denominated distances.
const MILES_MEAN_CEILING: f64 = 200.0;

/// A chunk median below this is consistent with mile-denominated distances.
const MILES_MEDIAN_CEILING: f64 = 30.0;

/// Ordered timestamp formats tried during coercion; first parse wins.
static DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

static DATE_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Coerce a raw cell into a timestamp; `None` on any parse failure.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if DATE_ONLY_REGEX.is_match(value) {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Coerce a raw cell into a finite float; `None` on failure.
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Fetch a cell by resolved column index, treating absent and blank cells
/// alike. Ragged rows simply yield `None` for their missing tail.
fn field<'a>(row: &'a StringRecord, index: Option<usize>) -> Option<&'a str> {
    index
        .and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Normalize one chunk: map and coerce every row, then apply the unit
/// heuristic to the chunk's distance population. No rows are dropped.
pub fn normalize_chunk(columns: &ColumnMap, chunk: &RawChunk) -> Vec<NormalizedTrip> {
    let mut trips: Vec<NormalizedTrip> = chunk
        .rows
        .iter()
        .map(|row| normalize_row(columns, row))
        .collect();
    correct_distance_units(&mut trips);
    trips
}

fn normalize_row(columns: &ColumnMap, row: &StringRecord) -> NormalizedTrip {
    NormalizedTrip {
        pickup_datetime: field(row, columns.pickup_datetime).and_then(parse_datetime),
        dropoff_datetime: field(row, columns.dropoff_datetime).and_then(parse_datetime),
        pickup_lat: field(row, columns.pickup_lat).and_then(parse_number),
        pickup_lon: field(row, columns.pickup_lon).and_then(parse_number),
        dropoff_lat: field(row, columns.dropoff_lat).and_then(parse_number),
        dropoff_lon: field(row, columns.dropoff_lon).and_then(parse_number),
        passenger_count: field(row, columns.passenger_count)
            .and_then(parse_number)
            .map(|v| v as i64)
            .unwrap_or(1),
        trip_distance_km: field(row, columns.trip_distance).and_then(parse_number),
        fare_amount: field(row, columns.fare_amount).and_then(parse_number),
        tip_amount: match columns.tip_amount {
            Some(_) => field(row, columns.tip_amount).and_then(parse_number),
            None => Some(0.0),
        },
        vendor_code: field(row, columns.vendor_code).map(str::to_string),
        ..NormalizedTrip::default()
    }
}

/// Decide per chunk whether distances look mile-denominated and convert.
///
/// The decision is strictly chunk-local: each chunk's mean/median is
/// computed over its own non-null distances, so heterogeneous datasets
/// may see different conversions across chunks.
fn correct_distance_units(trips: &mut [NormalizedTrip]) {
    let distances: Vec<f64> = trips.iter().filter_map(|t| t.trip_distance_km).collect();
    if distances.is_empty() {
        return;
    }
    if mean(&distances) < MILES_MEAN_CEILING && median(&distances) < MILES_MEDIAN_CEILING {
        for trip in trips.iter_mut() {
            if let Some(distance) = trip.trip_distance_km.as_mut() {
                *distance *= MILES_TO_KM;
            }
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with the even-count convention of averaging the middle pair.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn chunk_of(rows: Vec<Vec<&str>>) -> RawChunk {
        RawChunk {
            index: 1,
            rows: rows.into_iter().map(StringRecord::from).collect(),
        }
    }

    #[test]
    fn test_parse_datetime_formats() {
        let ts = parse_datetime("2016-01-01 08:00:00").unwrap();
        assert_eq!(ts.hour(), 8);
        assert!(parse_datetime("2016-01-01T08:00:00").is_some());
        assert!(parse_datetime("2016-01-01 08:00:00.500").is_some());
        assert!(parse_datetime("01/31/2016 23:59:59").is_some());
        assert!(parse_datetime("01/31/2016 23:59").is_some());

        let midnight = parse_datetime("2016-01-01").unwrap();
        assert_eq!(midnight.hour(), 0);
        assert_eq!(midnight.day(), 1);
    }

    #[test]
    fn test_parse_datetime_garbage_is_none() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("   ").is_none());
        assert!(parse_datetime("not a date").is_none());
        assert!(parse_datetime("2016-13-45 99:99:99").is_none());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 3.5 "), Some(3.5));
        assert_eq!(parse_number("-2"), Some(-2.0));
        assert!(parse_number("abc").is_none());
        assert!(parse_number("").is_none());
        assert!(parse_number("inf").is_none());
        assert!(parse_number("NaN").is_none());
    }

    #[test]
    fn test_defaults_when_columns_absent() {
        let headers = StringRecord::from(vec!["trip_distance", "fare_amount"]);
        let columns = ColumnMap::resolve(&headers);
        let trips = normalize_chunk(&columns, &chunk_of(vec![vec!["2.0", "10.0"]]));

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].passenger_count, 1);
        assert_eq!(trips[0].tip_amount, Some(0.0));
        assert!(trips[0].vendor_code.is_none());
        assert!(trips[0].pickup_datetime.is_none());
    }

    #[test]
    fn test_unparseable_tip_stays_null_when_column_present() {
        let headers = StringRecord::from(vec!["tip_amount"]);
        let columns = ColumnMap::resolve(&headers);
        let trips = normalize_chunk(&columns, &chunk_of(vec![vec!["oops"]]));
        assert!(trips[0].tip_amount.is_none());
    }

    #[test]
    fn test_unparseable_passenger_count_defaults_to_one() {
        let headers = StringRecord::from(vec!["passenger_count"]);
        let columns = ColumnMap::resolve(&headers);
        let trips = normalize_chunk(&columns, &chunk_of(vec![vec!["x"], vec!["3"]]));
        assert_eq!(trips[0].passenger_count, 1);
        assert_eq!(trips[1].passenger_count, 3);
    }

    #[test]
    fn test_ragged_row_yields_nulls() {
        let headers = StringRecord::from(vec!["trip_distance", "fare_amount"]);
        let columns = ColumnMap::resolve(&headers);
        // Row has only one cell; fare falls off the end.
        let trips = normalize_chunk(&columns, &chunk_of(vec![vec!["100000.0"]]));
        assert_eq!(trips[0].trip_distance_km, Some(100000.0));
        assert!(trips[0].fare_amount.is_none());
    }

    #[test]
    fn test_unit_heuristic_converts_mile_like_chunk() {
        let headers = StringRecord::from(vec!["trip_distance"]);
        let columns = ColumnMap::resolve(&headers);
        let trips = normalize_chunk(
            &columns,
            &chunk_of(vec![vec!["1.0"], vec!["5.0"], vec!["10.0"]]),
        );
        assert!((trips[0].trip_distance_km.unwrap() - MILES_TO_KM).abs() < 1e-9);
        assert!((trips[1].trip_distance_km.unwrap() - 5.0 * MILES_TO_KM).abs() < 1e-9);
    }

    #[test]
    fn test_unit_heuristic_leaves_high_mean_chunk_alone() {
        // Median 2 is under the ceiling but the mean (334.3) is not.
        let headers = StringRecord::from(vec!["trip_distance"]);
        let columns = ColumnMap::resolve(&headers);
        let trips = normalize_chunk(
            &columns,
            &chunk_of(vec![vec!["1.0"], vec!["2.0"], vec!["1000.0"]]),
        );
        assert_eq!(trips[0].trip_distance_km, Some(1.0));
        assert_eq!(trips[2].trip_distance_km, Some(1000.0));
    }

    #[test]
    fn test_unit_heuristic_requires_low_median_too() {
        // Mean 100 (< 200) but median 90 (>= 30): no conversion.
        let headers = StringRecord::from(vec!["trip_distance"]);
        let columns = ColumnMap::resolve(&headers);
        let trips = normalize_chunk(
            &columns,
            &chunk_of(vec![vec!["120.0"], vec!["90.0"], vec!["90.0"]]),
        );
        assert_eq!(trips[1].trip_distance_km, Some(90.0));
    }

    #[test]
    fn test_median_of_even_count_averages_middle_pair() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_all_null_distances_skip_heuristic() {
        let headers = StringRecord::from(vec!["trip_distance"]);
        let columns = ColumnMap::resolve(&headers);
        let trips = normalize_chunk(&columns, &chunk_of(vec![vec![""], vec!["junk"]]));
        assert!(trips.iter().all(|t| t.trip_distance_km.is_none()));
    }
}
