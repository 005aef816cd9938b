//! Derived trip features
//!
//! Every derivation degrades to a null on missing or invalid input;
//! nothing here returns an error or lets a non-finite value through to
//! storage.

use chrono::Timelike;

use crate::model::NormalizedTrip;

/// Fill the derived fields of a normalized record in place.
pub fn derive(trip: &mut NormalizedTrip) {
    trip.trip_duration_seconds = match (trip.pickup_datetime, trip.dropoff_datetime) {
        (Some(pickup), Some(dropoff)) => Some((dropoff - pickup).num_seconds() as f64),
        _ => None,
    };
    trip.trip_speed_kmh = speed_kmh(trip.trip_distance_km, trip.trip_duration_seconds);
    trip.fare_per_km = safe_div(trip.fare_amount, trip.trip_distance_km);
    trip.tip_pct = safe_div(trip.tip_amount, trip.fare_amount);
    trip.hour_of_day = trip.pickup_datetime.map(|t| t.hour());
    trip.day_of_week = trip.pickup_datetime.map(|t| t.format("%A").to_string());
}

/// Division that can only yield a finite quotient: `None` when either
/// operand is missing, the divisor is zero, or the quotient is
/// non-finite.
pub fn safe_div(dividend: Option<f64>, divisor: Option<f64>) -> Option<f64> {
    let (a, b) = (dividend?, divisor?);
    if b == 0.0 {
        return None;
    }
    let quotient = a / b;
    quotient.is_finite().then_some(quotient)
}

fn speed_kmh(distance_km: Option<f64>, duration_seconds: Option<f64>) -> Option<f64> {
    let (distance, duration) = (distance_km?, duration_seconds?);
    if distance <= 0.0 || duration <= 0.0 {
        return None;
    }
    let speed = distance / (duration / 3600.0);
    speed.is_finite().then_some(speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::normalize::parse_datetime;

    fn trip_with_timestamps(pickup: &str, dropoff: &str) -> NormalizedTrip {
        NormalizedTrip {
            pickup_datetime: parse_datetime(pickup),
            dropoff_datetime: parse_datetime(dropoff),
            ..NormalizedTrip::default()
        }
    }

    #[test]
    fn test_duration_and_time_features() {
        let mut trip = trip_with_timestamps("2016-01-01 08:00:00", "2016-01-01 08:15:00");
        derive(&mut trip);
        assert_eq!(trip.trip_duration_seconds, Some(900.0));
        assert_eq!(trip.hour_of_day, Some(8));
        assert_eq!(trip.day_of_week.as_deref(), Some("Friday"));
    }

    #[test]
    fn test_missing_timestamp_nulls_time_features() {
        let mut trip = NormalizedTrip {
            dropoff_datetime: parse_datetime("2016-01-01 08:15:00"),
            ..NormalizedTrip::default()
        };
        derive(&mut trip);
        assert!(trip.trip_duration_seconds.is_none());
        assert!(trip.hour_of_day.is_none());
        assert!(trip.day_of_week.is_none());
    }

    #[test]
    fn test_speed() {
        let mut trip = trip_with_timestamps("2016-01-01 08:00:00", "2016-01-01 09:00:00");
        trip.trip_distance_km = Some(30.0);
        derive(&mut trip);
        assert_eq!(trip.trip_speed_kmh, Some(30.0));
    }

    #[test]
    fn test_speed_null_on_nonpositive_inputs() {
        // Dropoff before pickup: negative duration.
        let mut trip = trip_with_timestamps("2016-01-01 09:00:00", "2016-01-01 08:00:00");
        trip.trip_distance_km = Some(5.0);
        derive(&mut trip);
        assert!(trip.trip_speed_kmh.is_none());

        // Zero distance.
        let mut trip = trip_with_timestamps("2016-01-01 08:00:00", "2016-01-01 09:00:00");
        trip.trip_distance_km = Some(0.0);
        derive(&mut trip);
        assert!(trip.trip_speed_kmh.is_none());
    }

    #[test]
    fn test_fare_per_km_zero_distance_is_null_not_infinity() {
        let mut trip = NormalizedTrip {
            fare_amount: Some(10.0),
            trip_distance_km: Some(0.0),
            ..NormalizedTrip::default()
        };
        derive(&mut trip);
        assert!(trip.fare_per_km.is_none());
    }

    #[test]
    fn test_tip_pct() {
        let mut trip = NormalizedTrip {
            fare_amount: Some(15.0),
            tip_amount: Some(3.0),
            ..NormalizedTrip::default()
        };
        derive(&mut trip);
        assert_eq!(trip.tip_pct, Some(0.2));
    }

    #[test]
    fn test_tip_pct_null_when_fare_missing_or_zero() {
        let mut trip = NormalizedTrip {
            tip_amount: Some(3.0),
            ..NormalizedTrip::default()
        };
        derive(&mut trip);
        assert!(trip.tip_pct.is_none());

        trip.fare_amount = Some(0.0);
        derive(&mut trip);
        assert!(trip.tip_pct.is_none());
    }

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(Some(10.0), Some(4.0)), Some(2.5));
        assert_eq!(safe_div(Some(10.0), Some(0.0)), None);
        assert_eq!(safe_div(None, Some(4.0)), None);
        assert_eq!(safe_div(Some(10.0), None), None);
        assert_eq!(safe_div(Some(f64::MAX), Some(f64::MIN_POSITIVE)), None);
    }
}
