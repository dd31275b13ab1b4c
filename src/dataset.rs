//! Reference datasets consumed by the metrics aggregator.
//!
//! A [`Dataset`] bundles the four tables behind the dashboard. It is built
//! once (from the bundled sample or a JSON file) and only ever borrowed
//! immutably afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::MetricsError;

/// Fare statistics for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictStat {
    pub name: String,
    pub average_fare: f64,
    pub ride_count: u64,
    pub revenue: f64,
}

/// One month of revenue and ride volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub revenue: f64,
    pub ride_count: u64,
    pub average_fare: f64,
}

/// Qualitative demand label for a time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DemandCategory {
    Peak,
    #[serde(rename = "Off-Peak", alias = "OffPeak")]
    OffPeak,
    Moderate,
    Night,
}

impl fmt::Display for DemandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DemandCategory::Peak => "Peak",
            DemandCategory::OffPeak => "Off-Peak",
            DemandCategory::Moderate => "Moderate",
            DemandCategory::Night => "Night",
        };
        f.write_str(label)
    }
}

/// Ride volume and fare for a time-of-day bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDaySlot {
    pub label: String,
    pub ride_count: u64,
    pub average_fare: f64,
    pub demand_category: DemandCategory,
}

/// Share of rides taken with one service type, in whole percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideTypeShare {
    pub type_name: String,
    pub percent_share: u8,
}

/// The four reference tables behind the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub districts: Vec<DistrictStat>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub time_of_day: Vec<TimeOfDaySlot>,
    pub ride_types: Vec<RideTypeShare>,
}

impl Dataset {
    /// Bundled Kigali sample figures.
    pub fn sample() -> Self {
        let districts = [
            ("Nyarugenge", 2500.0, 1250, 3_125_000.0),
            ("Gasabo", 3200.0, 980, 3_136_000.0),
            ("Kicukiro", 2800.0, 1100, 3_080_000.0),
            ("Rwamagana", 4500.0, 450, 2_025_000.0),
            ("Musanze", 3800.0, 320, 1_216_000.0),
        ]
        .into_iter()
        .map(|(name, average_fare, ride_count, revenue)| DistrictStat {
            name: name.to_string(),
            average_fare,
            ride_count,
            revenue,
        })
        .collect();

        let monthly_trends = [
            ("Jan", 8_500_000.0, 3200, 2656.0),
            ("Feb", 9_200_000.0, 3450, 2667.0),
            ("Mar", 10_100_000.0, 3800, 2658.0),
            ("Apr", 9_800_000.0, 3650, 2685.0),
            ("May", 11_200_000.0, 4100, 2732.0),
            ("Jun", 12_500_000.0, 4500, 2778.0),
        ]
        .into_iter()
        .map(|(month, revenue, ride_count, average_fare)| MonthlyTrend {
            month: month.to_string(),
            revenue,
            ride_count,
            average_fare,
        })
        .collect();

        let time_of_day = [
            ("6-9 AM", 850, 3200.0, DemandCategory::Peak),
            ("9-12 PM", 420, 2800.0, DemandCategory::OffPeak),
            ("12-3 PM", 650, 2900.0, DemandCategory::Moderate),
            ("3-6 PM", 780, 3100.0, DemandCategory::Peak),
            ("6-9 PM", 920, 3400.0, DemandCategory::Peak),
            ("9-12 AM", 280, 3800.0, DemandCategory::Night),
        ]
        .into_iter()
        .map(|(label, ride_count, average_fare, demand_category)| TimeOfDaySlot {
            label: label.to_string(),
            ride_count,
            average_fare,
            demand_category,
        })
        .collect();

        let ride_types = [
            ("UberX", 45),
            ("UberXL", 25),
            ("Uber Moto", 20),
            ("Uber Premium", 10),
        ]
        .into_iter()
        .map(|(type_name, percent_share)| RideTypeShare {
            type_name: type_name.to_string(),
            percent_share,
        })
        .collect();

        Dataset {
            districts,
            monthly_trends,
            time_of_day,
            ride_types,
        }
    }

    /// Loads a dataset from a JSON file at `path`.
    ///
    /// The document holds the four tables as arrays:
    /// ```json
    /// {
    ///   "districts": [{"name": "Gasabo", "average_fare": 3200, "ride_count": 980, "revenue": 3136000}],
    ///   "monthly_trends": [{"month": "Jan", "revenue": 8500000, "ride_count": 3200, "average_fare": 2656}],
    ///   "time_of_day": [{"label": "6-9 AM", "ride_count": 850, "average_fare": 3200, "demand_category": "Peak"}],
    ///   "ride_types": [{"type_name": "UberX", "percent_share": 45}]
    /// }
    /// ```
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset '{path}'"))?;
        let dataset: Dataset = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse dataset '{path}'"))?;
        debug!(
            path,
            districts = dataset.districts.len(),
            months = dataset.monthly_trends.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Checks that every table is populated and that ride-type shares sum to 100.
    pub fn validate(&self) -> Result<(), MetricsError> {
        if self.districts.is_empty() {
            return Err(MetricsError::EmptyDataset("districts"));
        }
        if self.monthly_trends.is_empty() {
            return Err(MetricsError::EmptyDataset("monthly_trends"));
        }
        if self.time_of_day.is_empty() {
            return Err(MetricsError::EmptyDataset("time_of_day"));
        }
        if self.ride_types.is_empty() {
            return Err(MetricsError::EmptyDataset("ride_types"));
        }

        let share_sum: u32 = self
            .ride_types
            .iter()
            .map(|r| u32::from(r.percent_share))
            .sum();
        if share_sum != 100 {
            return Err(MetricsError::InvalidDataset(format!(
                "ride type shares sum to {share_sum}, expected 100"
            )));
        }

        Ok(())
    }

    /// Looks up a district by name, ignoring ASCII case.
    pub fn district(&self, name: &str) -> Option<&DistrictStat> {
        self.districts
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}
