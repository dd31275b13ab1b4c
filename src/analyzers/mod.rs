//! Raw ride cleaning and summary tables.
//!
//! This module reads a per-ride CSV export, removes duplicate, invalid,
//! unmapped and outlier records, and writes the cleaned rides together with
//! district, monthly and time-of-day summary CSVs.

pub mod aggregate;
pub mod analyzer;
pub mod clean;
pub mod types;
pub mod utility;
