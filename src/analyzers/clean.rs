//! Record-level cleaning: deduplication, validity checks, district
//! standardisation and fare outlier removal.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::analyzers::types::{CleanRide, CleaningReport, RawRide};
use crate::analyzers::utility::quantile;

/// Districts recognised by the pipeline, keyed by lowercase spelling.
static DISTRICTS: &[(&str, &str)] = &[
    ("nyarugenge", "Nyarugenge"),
    ("gasabo", "Gasabo"),
    ("kicukiro", "Kicukiro"),
    ("rwamagana", "Rwamagana"),
    ("musanze", "Musanze"),
];

const IQR_MULTIPLIER: f64 = 1.5;

/// Maps a district spelling to its canonical name, ignoring case.
///
/// Surrounding whitespace is not stripped, so `" gasabo "` is unknown.
pub fn canonical_district(name: &str) -> Option<&'static str> {
    let key = name.to_lowercase();
    DISTRICTS
        .iter()
        .find(|(raw, _)| *raw == key)
        .map(|(_, canonical)| *canonical)
}

/// Parses `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or RFC 3339.
///
/// RFC 3339 values keep their local wall-clock time.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Drops rides whose `ride_id` was already seen, keeping the first.
pub fn dedupe(rows: Vec<RawRide>) -> Vec<RawRide> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|r| seen.insert(r.ride_id.clone()))
        .collect()
}

/// Inclusive fare bounds `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
pub fn iqr_bounds(fares: &[f64]) -> Option<(f64, f64)> {
    let mut sorted = fares.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile(&sorted, 0.25)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - IQR_MULTIPLIER * iqr, q3 + IQR_MULTIPLIER * iqr))
}

struct ValidRide {
    raw: RawRide,
    pickup: NaiveDateTime,
    dropoff: NaiveDateTime,
    fare: f64,
    distance: f64,
    duration: f64,
}

fn validate(raw: RawRide) -> Option<ValidRide> {
    let pickup = parse_datetime(&raw.pickup_datetime)?;
    let dropoff = parse_datetime(&raw.dropoff_datetime)?;
    let fare = raw.fare_amount.filter(|v| v.is_finite() && *v > 0.0)?;
    let distance = raw.distance_km.filter(|v| v.is_finite() && *v > 0.0)?;
    let duration = raw.duration_minutes.filter(|v| v.is_finite() && *v > 0.0)?;
    Some(ValidRide {
        raw,
        pickup,
        dropoff,
        fare,
        distance,
        duration,
    })
}

fn into_clean(ride: ValidRide, pickup_district: &str, dropoff_district: &str) -> CleanRide {
    CleanRide {
        ride_id: ride.raw.ride_id,
        pickup_datetime: ride.pickup,
        dropoff_datetime: ride.dropoff,
        fare_amount: ride.fare,
        distance_km: ride.distance,
        duration_minutes: ride.duration,
        pickup_district: pickup_district.to_string(),
        dropoff_district: dropoff_district.to_string(),
        service_type: ride.raw.service_type,
        hour: ride.pickup.hour(),
        day_of_week: ride.pickup.format("%A").to_string(),
        month: ride.pickup.month(),
        year: ride.pickup.year(),
    }
}

/// Runs every record-level cleaning stage over `rows`.
#[tracing::instrument(skip_all, fields(raw_records = rows.len()))]
pub fn clean_rides(rows: Vec<RawRide>) -> (Vec<CleanRide>, CleaningReport) {
    let mut report = CleaningReport {
        raw_records: rows.len(),
        ..Default::default()
    };

    let rows = dedupe(rows);
    report.after_dedup = rows.len();
    info!(records = report.after_dedup, "After removing duplicates");

    let valid: Vec<ValidRide> = rows.into_iter().filter_map(validate).collect();
    report.after_validity = valid.len();
    info!(records = report.after_validity, "After removing invalid records");

    let mapped: Vec<CleanRide> = valid
        .into_iter()
        .filter_map(|ride| {
            let pickup = canonical_district(&ride.raw.pickup_district)?;
            let dropoff = canonical_district(&ride.raw.dropoff_district)?;
            Some(into_clean(ride, pickup, dropoff))
        })
        .collect();
    report.after_districts = mapped.len();
    info!(records = report.after_districts, "After district standardization");

    let fares: Vec<f64> = mapped.iter().map(|r| r.fare_amount).collect();
    let cleaned: Vec<CleanRide> = match iqr_bounds(&fares) {
        Some((lower, upper)) => {
            debug!(lower, upper, "Fare outlier bounds");
            mapped
                .into_iter()
                .filter(|r| r.fare_amount >= lower && r.fare_amount <= upper)
                .collect()
        }
        None => mapped,
    };
    report.after_outliers = cleaned.len();
    info!(records = report.after_outliers, "After outlier removal");

    report.first_pickup = cleaned.iter().map(|r| r.pickup_datetime).min();
    report.last_pickup = cleaned.iter().map(|r| r.pickup_datetime).max();
    report.districts = cleaned
        .iter()
        .map(|r| r.pickup_district.as_str())
        .collect::<HashSet<_>>()
        .len();
    report.service_types = cleaned
        .iter()
        .map(|r| r.service_type.as_str())
        .collect::<HashSet<_>>()
        .len();

    (cleaned, report)
}
