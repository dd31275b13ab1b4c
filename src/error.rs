//! Typed errors for metric aggregation and dashboard filters.

/// Errors raised by [`crate::stats::MetricsAggregator`] and filter parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// The named collection has no rows.
    #[error("dataset `{0}` is empty")]
    EmptyDataset(&'static str),

    /// The named collection has rows but its denominator sums to zero.
    #[error("denominator for `{0}` is zero")]
    ZeroDenominator(&'static str),

    /// A selector value from the presentation layer was not recognised.
    #[error("invalid {kind} filter: {value:?}")]
    InvalidFilter { kind: &'static str, value: String },

    /// A loaded dataset breaks one of its invariants.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
}

pub type MetricsResult<T> = Result<T, MetricsError>;
