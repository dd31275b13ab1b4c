//! Output formatting and persistence for dashboard figures.
//!
//! Supports pretty-printing, JSON logging and export, and CSV tables.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use tracing::{debug, info};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `records` to a CSV file at `path`, replacing any existing file.
///
/// The header row is written even when `records` is empty.
pub fn write_records<T: Serialize>(path: &str, records: &[T], headers: &[&str]) -> Result<()> {
    debug!(path, rows = records.len(), "Writing CSV table");

    let file = File::create(path).with_context(|| format!("failed to create '{path}'"))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(!records.is_empty())
        .from_writer(file);

    if records.is_empty() {
        writer.write_record(headers)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Serializes `value` as JSON into `path`, gzip-compressed when `gzip` is set.
pub fn write_json(path: &str, value: &impl Serialize, gzip: bool) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;

    let contents = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body)?;
        encoder.finish()?
    } else {
        body
    };

    std::fs::write(path, &contents).with_context(|| format!("failed to write '{path}'"))?;
    info!(path, bytes = contents.len(), gzip, "JSON export written");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::filter::DashboardFilter;
    use crate::stats::MetricsAggregator;
    use flate2::read::GzDecoder;
    use std::env;
    use std::fs;
    use std::io::Read;
    use std::path::Path;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        count: u32,
    }

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&Dataset::sample());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&Dataset::sample()).unwrap();
    }

    #[test]
    fn test_write_records_rows_and_header() {
        let path = temp_path("kigali_fares_test_rows.csv");
        let _ = fs::remove_file(&path);

        let rows = [Row { name: "a", count: 1 }, Row { name: "b", count: 2 }];
        write_records(&path, &rows, &["name", "count"]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["name,count", "a,1", "b,2"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_records_overwrites() {
        let path = temp_path("kigali_fares_test_overwrite.csv");

        let rows = [Row { name: "a", count: 1 }];
        write_records(&path, &rows, &["name", "count"]).unwrap();
        write_records(&path, &rows, &["name", "count"]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_records_empty_keeps_header() {
        let path = temp_path("kigali_fares_test_empty.csv");

        write_records::<Row>(&path, &[], &["name", "count"]).unwrap();

        assert!(Path::new(&path).exists());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "name,count");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_gzip_round_trip() {
        let path = temp_path("kigali_fares_test_summary.json.gz");
        let ds = Dataset::sample();
        let summary = MetricsAggregator::new(&ds)
            .summary(DashboardFilter::default())
            .unwrap();

        write_json(&path, &summary, true).unwrap();

        let mut decoder = GzDecoder::new(File::open(&path).unwrap());
        let mut text = String::new();
        decoder.read_to_string(&mut text).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total_rides"], 22_700);
        assert_eq!(value["filter"]["timeframe"], "6months");

        fs::remove_file(&path).unwrap();
    }
}
