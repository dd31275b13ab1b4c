use std::collections::BTreeMap;

use crate::analyzers::types::{CleanRide, DistrictPerformance, MonthlyTrendRow, TimeOfDayRow};
use crate::analyzers::utility::{mean, pct_change, round_to};
use crate::dataset::DemandCategory;

/// Hour buckets as `(start, end, category)`. Hours outside every bucket
/// fall into the night bucket.
static TIME_BUCKETS: &[(u32, u32, DemandCategory)] = &[
    (6, 9, DemandCategory::Peak),
    (9, 12, DemandCategory::OffPeak),
    (12, 15, DemandCategory::Moderate),
    (15, 18, DemandCategory::Peak),
    (18, 21, DemandCategory::Peak),
];

const NIGHT_BUCKET: (u32, u32, DemandCategory) = (21, 24, DemandCategory::Night);

/// Demand bucket `(start, end, category)` for a pickup hour.
pub fn demand_bucket(hour: u32) -> (u32, u32, DemandCategory) {
    TIME_BUCKETS
        .iter()
        .copied()
        .find(|(start, end, _)| (*start..*end).contains(&hour))
        .unwrap_or(NIGHT_BUCKET)
}

/// Label such as `6-9 AM`; buckets ending after noon are `PM`.
pub fn time_period_label(start: u32, end: u32) -> String {
    let suffix = if end <= 12 { "AM" } else { "PM" };
    format!("{}-{} {}", start, end, suffix)
}

fn share(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        round_to(part / total * 100.0, 1)
    }
}

/// Groups rides by pickup district, sorted by district name.
///
/// Totals and averages are rounded to 2 decimals before market shares are
/// taken, and shares are rounded to 1 decimal.
pub fn district_performance(rides: &[CleanRide]) -> Vec<DistrictPerformance> {
    let mut groups: BTreeMap<&str, Vec<&CleanRide>> = BTreeMap::new();
    for ride in rides {
        groups.entry(ride.pickup_district.as_str()).or_default().push(ride);
    }

    let mut rows: Vec<DistrictPerformance> = groups
        .into_iter()
        .map(|(district, group)| {
            let fares: Vec<f64> = group.iter().map(|r| r.fare_amount).collect();
            let distances: Vec<f64> = group.iter().map(|r| r.distance_km).collect();
            let durations: Vec<f64> = group.iter().map(|r| r.duration_minutes).collect();

            DistrictPerformance {
                district: district.to_string(),
                total_rides: group.len() as u64,
                total_revenue: round_to(fares.iter().sum(), 2),
                avg_fare: round_to(mean(&fares), 2),
                avg_distance: round_to(mean(&distances), 2),
                avg_duration: round_to(mean(&durations), 2),
                market_share_rides: 0.0,
                market_share_revenue: 0.0,
            }
        })
        .collect();

    let ride_total: u64 = rows.iter().map(|r| r.total_rides).sum();
    let revenue_total: f64 = rows.iter().map(|r| r.total_revenue).sum();
    for row in &mut rows {
        row.market_share_rides = share(row.total_rides as f64, ride_total as f64);
        row.market_share_revenue = share(row.total_revenue, revenue_total);
    }

    rows
}

/// Groups rides by pickup `(year, month)` in calendar order.
///
/// Growth rates compare each month with the one before it; the first
/// month has zero growth. Every figure ends up rounded to 1 decimal.
pub fn monthly_trends(rides: &[CleanRide]) -> Vec<MonthlyTrendRow> {
    let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for ride in rides {
        groups
            .entry((ride.year, ride.month))
            .or_default()
            .push(ride.fare_amount);
    }

    let mut rows = Vec::with_capacity(groups.len());
    let mut previous: Option<(f64, f64)> = None;

    for ((year, month), fares) in groups {
        let total_rides = fares.len() as u64;
        let total_revenue = round_to(fares.iter().sum(), 2);
        let avg_fare = round_to(mean(&fares), 2);

        let (growth_rate_rides, growth_rate_revenue) = match previous {
            Some((prev_rides, prev_revenue)) => (
                pct_change(prev_rides, total_rides as f64),
                pct_change(prev_revenue, total_revenue),
            ),
            None => (0.0, 0.0),
        };
        previous = Some((total_rides as f64, total_revenue));

        rows.push(MonthlyTrendRow {
            year,
            month,
            total_rides,
            total_revenue: round_to(total_revenue, 1),
            avg_fare: round_to(avg_fare, 1),
            growth_rate_rides: round_to(growth_rate_rides, 1),
            growth_rate_revenue: round_to(growth_rate_revenue, 1),
        });
    }

    rows
}

/// Groups rides by demand bucket of their pickup hour, ordered by start hour.
pub fn time_of_day(rides: &[CleanRide]) -> Vec<TimeOfDayRow> {
    let mut groups: BTreeMap<u32, (u32, DemandCategory, Vec<f64>)> = BTreeMap::new();
    for ride in rides {
        let (start, end, category) = demand_bucket(ride.hour);
        groups
            .entry(start)
            .or_insert_with(|| (end, category, Vec::new()))
            .2
            .push(ride.fare_amount);
    }

    groups
        .into_iter()
        .map(|(start, (end, category, fares))| TimeOfDayRow {
            demand_category: category,
            hour_start: start,
            hour_end: end,
            total_rides: fares.len() as u64,
            avg_fare: round_to(mean(&fares), 2),
            total_revenue: round_to(fares.iter().sum(), 2),
            time_period: time_period_label(start, end),
        })
        .collect()
}
