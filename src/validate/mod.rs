//! Row validation
//!
//! Classifies a normalized, feature-derived record as accepted or
//! rejected. Every rule is evaluated independently so a record carries
//! all applicable reasons, not just the first; the audit trail depends on
//! that. A rejected record is reduced to its reasons; field values are
//! not retained.

use serde::{Deserialize, Serialize};

use crate::model::{CanonicalTrip, NormalizedTrip};

/// Geographic bounding box for plausible trips (NYC approx).
pub const MIN_LAT: f64 = 40.4;
pub const MAX_LAT: f64 = 40.95;
pub const MIN_LON: f64 = -74.35;
pub const MAX_LON: f64 = -73.7;

/// Speeds above this (km/h) are treated as data defects.
pub const MAX_SPEED_KMH: f64 = 200.0;

/// Why a record failed validation.
///
/// Closed set; `Display` renders the tag that appears in the exclusion
/// log. Variants are declared in rule-evaluation order, which is also the
/// order tags appear in a joined reason string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    MissingTimestamps,
    DropoffBeforePickup,
    InvalidPickupCoord,
    InvalidDropoffCoord,
    InvalidDistance,
    InvalidDuration,
    InvalidFare,
    UnrealisticSpeed,
}

impl ExclusionReason {
    /// The snake_case tag used in the exclusion log.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::MissingTimestamps => "missing_timestamps",
            ExclusionReason::DropoffBeforePickup => "dropoff_before_pickup",
            ExclusionReason::InvalidPickupCoord => "invalid_pickup_coord",
            ExclusionReason::InvalidDropoffCoord => "invalid_dropoff_coord",
            ExclusionReason::InvalidDistance => "invalid_distance",
            ExclusionReason::InvalidDuration => "invalid_duration",
            ExclusionReason::InvalidFare => "invalid_fare",
            ExclusionReason::UnrealisticSpeed => "unrealistic_speed",
        }
    }
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rejected record reduced to its accumulated reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub reasons: Vec<ExclusionReason>,
}

impl Rejection {
    /// Tags joined with `;`, in rule-evaluation order.
    pub fn reason_string(&self) -> String {
        self.reasons
            .iter()
            .map(ExclusionReason::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }
}

fn coordinate_in_bounds(lat: f64, lon: f64) -> bool {
    (MIN_LAT..=MAX_LAT).contains(&lat) && (MIN_LON..=MAX_LON).contains(&lon)
}

/// Validate one record, accumulating every applicable reason.
///
/// A record with zero reasons becomes a [`CanonicalTrip`]; otherwise the
/// record is dropped and only its [`Rejection`] survives.
pub fn validate(trip: NormalizedTrip) -> Result<CanonicalTrip, Rejection> {
    let mut reasons = Vec::new();

    let timestamps = match (trip.pickup_datetime, trip.dropoff_datetime) {
        (Some(pickup), Some(dropoff)) => {
            if dropoff < pickup {
                reasons.push(ExclusionReason::DropoffBeforePickup);
            }
            Some((pickup, dropoff))
        }
        _ => {
            reasons.push(ExclusionReason::MissingTimestamps);
            None
        }
    };

    let pickup_coord = match (trip.pickup_lat, trip.pickup_lon) {
        (Some(lat), Some(lon)) if coordinate_in_bounds(lat, lon) => Some((lat, lon)),
        _ => {
            reasons.push(ExclusionReason::InvalidPickupCoord);
            None
        }
    };

    let dropoff_coord = match (trip.dropoff_lat, trip.dropoff_lon) {
        (Some(lat), Some(lon)) if coordinate_in_bounds(lat, lon) => Some((lat, lon)),
        _ => {
            reasons.push(ExclusionReason::InvalidDropoffCoord);
            None
        }
    };

    let distance = match trip.trip_distance_km {
        Some(d) if d >= 0.0 => Some(d),
        _ => {
            reasons.push(ExclusionReason::InvalidDistance);
            None
        }
    };

    let duration = match trip.trip_duration_seconds {
        Some(d) if d > 0.0 => Some(d),
        _ => {
            reasons.push(ExclusionReason::InvalidDuration);
            None
        }
    };

    let fare = match trip.fare_amount {
        Some(f) if f >= 0.0 => Some(f),
        _ => {
            reasons.push(ExclusionReason::InvalidFare);
            None
        }
    };

    if trip
        .trip_speed_kmh
        .is_some_and(|s| s.is_finite() && s > MAX_SPEED_KMH)
    {
        reasons.push(ExclusionReason::UnrealisticSpeed);
    }

    match (timestamps, pickup_coord, dropoff_coord, distance, duration, fare) {
        (
            Some((pickup_datetime, dropoff_datetime)),
            Some((pickup_lat, pickup_lon)),
            Some((dropoff_lat, dropoff_lon)),
            Some(trip_distance_km),
            Some(trip_duration_seconds),
            Some(fare_amount),
        ) if reasons.is_empty() => Ok(CanonicalTrip {
            pickup_datetime,
            dropoff_datetime,
            pickup_lat,
            pickup_lon,
            dropoff_lat,
            dropoff_lon,
            passenger_count: trip.passenger_count,
            trip_distance_km,
            trip_duration_seconds,
            fare_amount,
            tip_amount: trip.tip_amount,
            trip_speed_kmh: trip.trip_speed_kmh,
            fare_per_km: trip.fare_per_km,
            tip_pct: trip.tip_pct,
            hour_of_day: trip.hour_of_day,
            day_of_week: trip.day_of_week,
            vendor_code: trip.vendor_code,
        }),
        _ => Err(Rejection { reasons }),
    }
}
