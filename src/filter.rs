//! Dashboard selector values.
//!
//! The presentation layer sends district and timeframe selections as plain
//! strings. They are parsed here and carried through to the summary, but
//! they do not subset the reference datasets.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::analyzers::clean::canonical_district;
use crate::error::MetricsError;

/// District selector: every district, or one named district.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum DistrictFilter {
    #[default]
    All,
    Named(String),
}

impl FromStr for DistrictFilter {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(DistrictFilter::All);
        }
        canonical_district(trimmed)
            .map(|name| DistrictFilter::Named(name.to_lowercase()))
            .ok_or_else(|| MetricsError::InvalidFilter {
                kind: "district",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for DistrictFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistrictFilter::All => f.write_str("all"),
            DistrictFilter::Named(name) => f.write_str(name),
        }
    }
}

impl From<DistrictFilter> for String {
    fn from(filter: DistrictFilter) -> Self {
        filter.to_string()
    }
}

/// Reporting window selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum Timeframe {
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
}

impl Timeframe {
    /// Number of months the window covers.
    pub fn months(self) -> u32 {
        match self {
            Timeframe::OneMonth => 1,
            Timeframe::ThreeMonths => 3,
            Timeframe::SixMonths => 6,
            Timeframe::OneYear => 12,
        }
    }
}

impl FromStr for Timeframe {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1month" => Ok(Timeframe::OneMonth),
            "3months" => Ok(Timeframe::ThreeMonths),
            "6months" => Ok(Timeframe::SixMonths),
            "1year" => Ok(Timeframe::OneYear),
            _ => Err(MetricsError::InvalidFilter {
                kind: "timeframe",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Timeframe::OneMonth => "1month",
            Timeframe::ThreeMonths => "3months",
            Timeframe::SixMonths => "6months",
            Timeframe::OneYear => "1year",
        };
        f.write_str(value)
    }
}

impl From<Timeframe> for String {
    fn from(timeframe: Timeframe) -> Self {
        timeframe.to_string()
    }
}

/// The pair of selections currently active on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DashboardFilter {
    pub district: DistrictFilter,
    pub timeframe: Timeframe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_district_filter_parsing() {
        assert_eq!("all".parse::<DistrictFilter>().unwrap(), DistrictFilter::All);
        assert_eq!("ALL".parse::<DistrictFilter>().unwrap(), DistrictFilter::All);
        assert_eq!(
            "Nyarugenge".parse::<DistrictFilter>().unwrap(),
            DistrictFilter::Named("nyarugenge".into())
        );
        assert!("".parse::<DistrictFilter>().is_err());
        assert!("gas/abo".parse::<DistrictFilter>().is_err());
    }

    #[test]
    fn test_unknown_district_rejected() {
        let err = "huye".parse::<DistrictFilter>().unwrap_err();
        assert_eq!(
            err,
            MetricsError::InvalidFilter {
                kind: "district",
                value: "huye".into()
            }
        );
    }

    #[test]
    fn test_timeframe_parsing() {
        assert_eq!("1month".parse::<Timeframe>().unwrap(), Timeframe::OneMonth);
        assert_eq!("3months".parse::<Timeframe>().unwrap(), Timeframe::ThreeMonths);
        assert_eq!("6months".parse::<Timeframe>().unwrap(), Timeframe::SixMonths);
        assert_eq!("1year".parse::<Timeframe>().unwrap(), Timeframe::OneYear);

        let err = "2weeks".parse::<Timeframe>().unwrap_err();
        assert_eq!(
            err,
            MetricsError::InvalidFilter {
                kind: "timeframe",
                value: "2weeks".into()
            }
        );
    }

    #[test]
    fn test_defaults_match_dashboard() {
        let filter = DashboardFilter::default();
        assert_eq!(filter.district, DistrictFilter::All);
        assert_eq!(filter.timeframe, Timeframe::SixMonths);
        assert_eq!(filter.timeframe.months(), 6);
    }

    #[test]
    fn test_filter_serializes_as_strings() {
        let filter = DashboardFilter {
            district: DistrictFilter::Named("gasabo".into()),
            timeframe: Timeframe::OneYear,
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["district"], "gasabo");
        assert_eq!(json["timeframe"], "1year");
    }
}
