use kigali_fares::analyzers::analyzer::{
    CLEANED_FILE, DISTRICT_FILE, TIME_FILE, TRENDS_FILE, run_cleaning,
};
use kigali_fares::dataset::Dataset;
use kigali_fares::error::MetricsError;
use kigali_fares::filter::DashboardFilter;
use kigali_fares::stats::MetricsAggregator;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
    let mut rdr = csv::Reader::from_path(path).expect("Failed to open output CSV");
    rdr.records().map(|r| r.unwrap()).collect()
}

fn num(record: &csv::StringRecord, idx: usize) -> f64 {
    record[idx].parse().unwrap()
}

#[test]
fn test_sample_dashboard_figures() {
    let dataset = Dataset::sample();
    let agg = MetricsAggregator::new(&dataset);

    assert_eq!(agg.total_revenue(), 61_300_000.0);
    assert_eq!(agg.total_rides(), 22_700);
    assert_eq!(agg.average_fare_overall().unwrap().round(), 2700.0);

    let nyarugenge = dataset.district("Nyarugenge").unwrap();
    let share = agg.revenue_share(nyarugenge).unwrap();
    let expected =
        3_125_000.0 / (3_125_000.0 + 3_136_000.0 + 3_080_000.0 + 2_025_000.0 + 1_216_000.0)
            * 100.0;
    assert!((share - expected).abs() < 1e-9);
}

#[test]
fn test_empty_rides_reports_error() {
    let mut dataset = Dataset::sample();
    dataset.monthly_trends.clear();
    let agg = MetricsAggregator::new(&dataset);

    assert_eq!(agg.total_rides(), 0);
    assert_eq!(
        agg.average_fare_overall(),
        Err(MetricsError::EmptyDataset("monthly_trends"))
    );
    assert!(agg.summary(DashboardFilter::default()).is_err());
}

#[test]
fn test_loaded_dataset_matches_sample_figures() {
    let path = env::temp_dir().join("kigali_fares_it_dataset.json");
    fs::write(&path, serde_json::to_string(&Dataset::sample()).unwrap()).unwrap();

    let dataset = Dataset::load(path.to_str().unwrap()).unwrap();
    let summary = MetricsAggregator::new(&dataset)
        .summary(DashboardFilter::default())
        .unwrap();

    assert_eq!(summary.total_revenue, 61_300_000.0);
    assert_eq!(summary.best_month.as_deref(), Some("Jun"));
    assert_eq!(summary.top_district_by_fare.as_deref(), Some("Rwamagana"));

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_cleaning_pipeline() {
    let out = temp_dir("kigali_fares_it_cleaning");
    let report = run_cleaning(&fixture("rides_raw.csv"), out.to_str().unwrap())
        .expect("Cleaning pipeline failed");

    assert_eq!(report.raw_records, 10);
    assert_eq!(report.after_dedup, 9);
    assert_eq!(report.after_validity, 7);
    assert_eq!(report.after_districts, 6);
    assert_eq!(report.after_outliers, 5);
    assert_eq!(report.districts, 3);
    assert_eq!(report.service_types, 3);
    assert_eq!(
        report.first_pickup.unwrap().to_string(),
        "2024-01-08 07:15:00"
    );
    assert_eq!(report.last_pickup.unwrap().to_string(), "2024-02-03 22:10:00");

    let cleaned = read_rows(&out.join(CLEANED_FILE));
    assert_eq!(cleaned.len(), 5);
    assert_eq!(&cleaned[0][0], "R001");
    assert_eq!(&cleaned[0][1], "2024-01-08 07:15:00");
    assert_eq!(&cleaned[0][6], "Nyarugenge");
    assert_eq!(&cleaned[0][10], "Monday");
    assert!(cleaned.iter().all(|r| &r[0] != "R009"));

    let districts = read_rows(&out.join(DISTRICT_FILE));
    let names: Vec<&str> = districts.iter().map(|r| &r[0]).collect();
    assert_eq!(names, vec!["Gasabo", "Kicukiro", "Nyarugenge"]);
    assert_eq!(num(&districts[0], 2), 6200.0);
    assert_eq!(num(&districts[0], 6), 40.0);
    assert_eq!(num(&districts[0], 7), 41.1);
    assert_eq!(num(&districts[1], 7), 18.5);
    assert_eq!(num(&districts[2], 7), 40.4);

    let trends = read_rows(&out.join(TRENDS_FILE));
    assert_eq!(trends.len(), 2);
    assert_eq!(num(&trends[0], 4), 2766.7);
    assert_eq!(num(&trends[0], 5), 0.0);
    assert_eq!(num(&trends[1], 3), 6800.0);
    assert_eq!(num(&trends[1], 5), -33.3);
    assert_eq!(num(&trends[1], 6), -18.1);

    let slots = read_rows(&out.join(TIME_FILE));
    let periods: Vec<&str> = slots.iter().map(|r| &r[6]).collect();
    assert_eq!(periods, vec!["6-9 AM", "12-15 PM", "18-21 PM", "21-24 PM"]);
    assert_eq!(&slots[2][0], "Peak");
    assert_eq!(num(&slots[2], 4), 3100.0);
    assert_eq!(&slots[3][0], "Night");

    fs::remove_dir_all(&out).unwrap();
}

#[test]
fn test_cleaning_missing_input_fails() {
    let out = temp_dir("kigali_fares_it_missing");
    assert!(run_cleaning("/nonexistent/rides.csv", out.to_str().unwrap()).is_err());
}
