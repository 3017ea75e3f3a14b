//! Stage metrics recorded through the `metrics` facade.
//!
//! No exporter is installed by this crate; an embedding application can
//! register a recorder to collect these.

use std::fmt;

/// All metric names emitted by the cleaning pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RowsLoaded,
    DuplicateRows,
    RowsDropped,
    RowsRetained,
    MathMismatches,
    UnknownItemsBefore,
    ItemsRecovered,
    RunDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsLoaded => "cafe_rows_loaded_total",
            MetricName::DuplicateRows => "cafe_duplicate_rows_total",
            MetricName::RowsDropped => "cafe_rows_dropped_total",
            MetricName::RowsRetained => "cafe_rows_retained_total",
            MetricName::MathMismatches => "cafe_math_mismatches_total",
            MetricName::UnknownItemsBefore => "cafe_unknown_items_total",
            MetricName::ItemsRecovered => "cafe_items_recovered_total",
            MetricName::RunDuration => "cafe_pipeline_duration_seconds",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub mod ingestion {
    use super::MetricName;

    pub fn rows_loaded(count: usize) {
        ::metrics::counter!(MetricName::RowsLoaded.as_str()).increment(count as u64);
    }

    pub fn duplicates_found(count: usize) {
        ::metrics::counter!(MetricName::DuplicateRows.as_str()).increment(count as u64);
    }
}

pub mod cleaning {
    use super::MetricName;

    pub fn rows_dropped(count: usize) {
        ::metrics::counter!(MetricName::RowsDropped.as_str()).increment(count as u64);
    }

    pub fn rows_retained(count: usize) {
        ::metrics::counter!(MetricName::RowsRetained.as_str()).increment(count as u64);
    }

    pub fn math_mismatches(count: usize) {
        ::metrics::counter!(MetricName::MathMismatches.as_str()).increment(count as u64);
    }

    /// Record how many unknown items the imputer saw and how many it filled
    pub fn imputation(unknown_before: usize, recovered: usize) {
        ::metrics::counter!(MetricName::UnknownItemsBefore.as_str())
            .increment(unknown_before as u64);
        ::metrics::counter!(MetricName::ItemsRecovered.as_str()).increment(recovered as u64);
    }
}

pub fn run_duration(seconds: f64) {
    ::metrics::histogram!(MetricName::RunDuration.as_str()).record(seconds);
}
