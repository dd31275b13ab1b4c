//! Data types used by the ride cleaning pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

use crate::dataset::DemandCategory;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn serialize_datetime<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dt.format(DATETIME_FORMAT).to_string())
}

/// A single row deserialized from the raw rides export.
///
/// Numeric columns that are blank or unparseable come through as `None`
/// and are dropped by the validity filter.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRide {
    pub ride_id: String,
    pub pickup_datetime: String,
    pub dropoff_datetime: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub fare_amount: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub distance_km: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub duration_minutes: Option<f64>,
    pub pickup_district: String,
    pub dropoff_district: String,
    pub service_type: String,
}

/// A validated ride with canonical districts and derived calendar fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRide {
    pub ride_id: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub pickup_datetime: NaiveDateTime,
    #[serde(serialize_with = "serialize_datetime")]
    pub dropoff_datetime: NaiveDateTime,
    pub fare_amount: f64,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub pickup_district: String,
    pub dropoff_district: String,
    pub service_type: String,
    pub hour: u32,
    pub day_of_week: String,
    pub month: u32,
    pub year: i32,
}

/// Per-district totals, averages and market shares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictPerformance {
    pub district: String,
    pub total_rides: u64,
    pub total_revenue: f64,
    pub avg_fare: f64,
    pub avg_distance: f64,
    pub avg_duration: f64,
    pub market_share_rides: f64,
    pub market_share_revenue: f64,
}

/// Totals for one calendar month with growth against the previous month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrendRow {
    pub year: i32,
    pub month: u32,
    pub total_rides: u64,
    pub total_revenue: f64,
    pub avg_fare: f64,
    pub growth_rate_rides: f64,
    pub growth_rate_revenue: f64,
}

/// Ride volume and fares for one time-of-day bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeOfDayRow {
    pub demand_category: DemandCategory,
    pub hour_start: u32,
    pub hour_end: u32,
    pub total_rides: u64,
    pub avg_fare: f64,
    pub total_revenue: f64,
    pub time_period: String,
}

/// Record counts after each cleaning stage, plus coverage figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub raw_records: usize,
    pub after_dedup: usize,
    pub after_validity: usize,
    pub after_districts: usize,
    pub after_outliers: usize,
    pub first_pickup: Option<NaiveDateTime>,
    pub last_pickup: Option<NaiveDateTime>,
    pub districts: usize,
    pub service_types: usize,
}
