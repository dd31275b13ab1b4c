use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::{Dataset, DistrictStat, MonthlyTrend, TimeOfDaySlot};
use crate::error::{MetricsError, MetricsResult};
use crate::filter::DashboardFilter;

/// Derives dashboard figures from a borrowed [`Dataset`].
///
/// Every method is a pure function of the dataset, so an aggregator can be
/// shared freely and called any number of times.
#[derive(Debug, Clone, Copy)]
pub struct MetricsAggregator<'a> {
    dataset: &'a Dataset,
}

/// One row of the district breakdown table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictShare {
    pub district: String,
    pub ride_count: u64,
    pub average_fare: f64,
    pub revenue: f64,
    pub revenue_share_pct: f64,
    pub revenue_share_of_total_pct: f64,
}

/// Headline figures for the dashboard, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub filter: DashboardFilter,
    pub total_revenue: f64,
    pub total_rides: u64,
    pub average_fare: f64,
    pub peak_slot: Option<String>,
    pub top_district_by_fare: Option<String>,
    pub top_district_by_rides: Option<String>,
    pub best_month: Option<String>,
    pub districts: Vec<DistrictShare>,
}

impl<'a> MetricsAggregator<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Percentage of `part` in `total`.
    ///
    /// Fails instead of producing infinity or NaN when `total` is zero.
    pub fn pct(part: f64, total: f64, what: &'static str) -> MetricsResult<f64> {
        if total == 0.0 {
            return Err(MetricsError::ZeroDenominator(what));
        }
        Ok(part / total * 100.0)
    }

    /// Sum of monthly revenue.
    pub fn total_revenue(&self) -> f64 {
        self.dataset.monthly_trends.iter().map(|m| m.revenue).sum()
    }

    /// Sum of monthly ride counts.
    pub fn total_rides(&self) -> u64 {
        self.dataset.monthly_trends.iter().map(|m| m.ride_count).sum()
    }

    /// Revenue per ride across every month.
    pub fn average_fare_overall(&self) -> MetricsResult<f64> {
        if self.dataset.monthly_trends.is_empty() {
            return Err(MetricsError::EmptyDataset("monthly_trends"));
        }
        let rides = self.total_rides();
        if rides == 0 {
            return Err(MetricsError::ZeroDenominator("monthly_trends.ride_count"));
        }
        Ok(self.total_revenue() / rides as f64)
    }

    pub fn total_district_revenue(&self) -> f64 {
        self.dataset.districts.iter().map(|d| d.revenue).sum()
    }

    pub fn total_district_rides(&self) -> u64 {
        self.dataset.districts.iter().map(|d| d.ride_count).sum()
    }

    /// Revenue of `district` as a percentage of all district revenue.
    pub fn revenue_share(&self, district: &DistrictStat) -> MetricsResult<f64> {
        if self.dataset.districts.is_empty() {
            return Err(MetricsError::EmptyDataset("districts"));
        }
        Self::pct(
            district.revenue,
            self.total_district_revenue(),
            "districts.revenue",
        )
    }

    /// Revenue of `district` as a percentage of the monthly revenue total.
    pub fn revenue_share_of_total(&self, district: &DistrictStat) -> MetricsResult<f64> {
        if self.dataset.monthly_trends.is_empty() {
            return Err(MetricsError::EmptyDataset("monthly_trends"));
        }
        Self::pct(
            district.revenue,
            self.total_revenue(),
            "monthly_trends.revenue",
        )
    }

    /// Rides of `district` as a percentage of all district rides.
    pub fn ride_share(&self, district: &DistrictStat) -> MetricsResult<f64> {
        if self.dataset.districts.is_empty() {
            return Err(MetricsError::EmptyDataset("districts"));
        }
        Self::pct(
            district.ride_count as f64,
            self.total_district_rides() as f64,
            "districts.ride_count",
        )
    }

    /// Rows for the district breakdown table, in dataset order.
    pub fn district_breakdown(&self) -> MetricsResult<Vec<DistrictShare>> {
        self.dataset
            .districts
            .iter()
            .map(|d| {
                Ok(DistrictShare {
                    district: d.name.clone(),
                    ride_count: d.ride_count,
                    average_fare: d.average_fare,
                    revenue: d.revenue,
                    revenue_share_pct: self.revenue_share(d)?,
                    revenue_share_of_total_pct: self.revenue_share_of_total(d)?,
                })
            })
            .collect()
    }

    /// Slot with the most rides. Ties go to the earliest slot.
    pub fn peak_slot(&self) -> Option<&'a TimeOfDaySlot> {
        self.dataset
            .time_of_day
            .iter()
            .reduce(|best, s| if s.ride_count > best.ride_count { s } else { best })
    }

    pub fn top_district_by_fare(&self) -> Option<&'a DistrictStat> {
        self.dataset
            .districts
            .iter()
            .reduce(|best, d| if d.average_fare > best.average_fare { d } else { best })
    }

    pub fn top_district_by_rides(&self) -> Option<&'a DistrictStat> {
        self.dataset
            .districts
            .iter()
            .reduce(|best, d| if d.ride_count > best.ride_count { d } else { best })
    }

    pub fn best_month_by_revenue(&self) -> Option<&'a MonthlyTrend> {
        self.dataset
            .monthly_trends
            .iter()
            .reduce(|best, m| if m.revenue > best.revenue { m } else { best })
    }

    /// Sum of ride-type shares; 100 for a consistent dataset.
    pub fn ride_type_total(&self) -> u32 {
        self.dataset
            .ride_types
            .iter()
            .map(|r| u32::from(r.percent_share))
            .sum()
    }

    /// Collects the headline figures for `filter`.
    ///
    /// The filter is recorded on the summary but does not narrow the data.
    pub fn summary(&self, filter: DashboardFilter) -> MetricsResult<DashboardSummary> {
        Ok(DashboardSummary {
            generated_at: Utc::now(),
            filter,
            total_revenue: self.total_revenue(),
            total_rides: self.total_rides(),
            average_fare: self.average_fare_overall()?,
            peak_slot: self.peak_slot().map(|s| s.label.clone()),
            top_district_by_fare: self.top_district_by_fare().map(|d| d.name.clone()),
            top_district_by_rides: self.top_district_by_rides().map(|d| d.name.clone()),
            best_month: self.best_month_by_revenue().map(|m| m.month.clone()),
            districts: self.district_breakdown()?,
        })
    }
}
