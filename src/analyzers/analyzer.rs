use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::analyzers::aggregate::{district_performance, monthly_trends, time_of_day};
use crate::analyzers::clean::clean_rides;
use crate::analyzers::types::{CleaningReport, RawRide};
use crate::output::write_records;

pub const CLEANED_FILE: &str = "kigali_uber_fares_cleaned.csv";
pub const DISTRICT_FILE: &str = "district_performance.csv";
pub const TRENDS_FILE: &str = "monthly_trends.csv";
pub const TIME_FILE: &str = "time_of_day_analysis.csv";

const CLEANED_HEADERS: &[&str] = &[
    "ride_id",
    "pickup_datetime",
    "dropoff_datetime",
    "fare_amount",
    "distance_km",
    "duration_minutes",
    "pickup_district",
    "dropoff_district",
    "service_type",
    "hour",
    "day_of_week",
    "month",
    "year",
];
const DISTRICT_HEADERS: &[&str] = &[
    "district",
    "total_rides",
    "total_revenue",
    "avg_fare",
    "avg_distance",
    "avg_duration",
    "market_share_rides",
    "market_share_revenue",
];
const TRENDS_HEADERS: &[&str] = &[
    "year",
    "month",
    "total_rides",
    "total_revenue",
    "avg_fare",
    "growth_rate_rides",
    "growth_rate_revenue",
];
const TIME_HEADERS: &[&str] = &[
    "demand_category",
    "hour_start",
    "hour_end",
    "total_rides",
    "avg_fare",
    "total_revenue",
    "time_period",
];

/// Reads every ride from a raw CSV export.
pub fn load_rides(path: &str) -> Result<Vec<RawRide>> {
    let file = File::open(path).with_context(|| format!("failed to open '{path}'"))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: RawRide = result.with_context(|| format!("malformed row in '{path}'"))?;
        rows.push(record);
    }

    Ok(rows)
}

/// Cleans the raw export at `input` and writes the cleaned rides and the
/// three summary tables into `output_dir`.
#[tracing::instrument]
pub fn run_cleaning(input: &str, output_dir: &str) -> Result<CleaningReport> {
    info!("Starting data cleaning process");

    let raw = load_rides(input)?;
    info!(records = raw.len(), "Loaded raw records");

    let (rides, report) = clean_rides(raw);

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory '{output_dir}'"))?;
    let out = Path::new(output_dir);
    let target = |name: &str| out.join(name).to_string_lossy().into_owned();

    let cleaned_path = target(CLEANED_FILE);
    write_records(&cleaned_path, &rides, CLEANED_HEADERS)?;
    info!(path = %cleaned_path, "Cleaned data saved");

    let district_path = target(DISTRICT_FILE);
    write_records(&district_path, &district_performance(&rides), DISTRICT_HEADERS)?;
    info!(path = %district_path, "District performance data saved");

    let trends_path = target(TRENDS_FILE);
    write_records(&trends_path, &monthly_trends(&rides), TRENDS_HEADERS)?;
    info!(path = %trends_path, "Monthly trends data saved");

    let time_path = target(TIME_FILE);
    write_records(&time_path, &time_of_day(&rides), TIME_HEADERS)?;
    info!(path = %time_path, "Time analysis data saved");

    info!(
        cleaned = report.after_outliers,
        districts = report.districts,
        service_types = report.service_types,
        "Data cleaning process completed"
    );

    Ok(report)
}
