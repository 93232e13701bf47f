//! Record aggregation and statistics.
//!
//! This module computes summary statistics over a slice of records.
//! Empty input yields an all-zero summary rather than an error.

use crate::models::{DataRecord, Summary};

/// Compute the summary statistics for a set of records.
pub fn summarize(records: &[DataRecord]) -> Summary {
    if records.is_empty() {
        return Summary::default();
    }

    let values = records.iter().map(DataRecord::value);

    Summary {
        total_records: records.len() as f64,
        average_value: round_to(mean(records), 2),
        max_value: values.clone().fold(f64::NEG_INFINITY, f64::max),
        min_value: values.fold(f64::INFINITY, f64::min),
    }
}

/// Arithmetic mean of the record values; `0.0` for no records.
pub fn mean(records: &[DataRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let sum: f64 = records.iter().map(DataRecord::value).sum();
    sum / records.len() as f64
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
