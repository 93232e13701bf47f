//! Advisory recommendations about data sufficiency and freshness.

use crate::models::DataRecord;
use chrono::{DateTime, Duration, Utc};

/// Below this many records the data set is considered too small.
pub const MIN_RECORDS: usize = 100;

/// Minimum share of records from the last day before data counts as stale.
pub const MIN_RECENT_RATIO: f64 = 0.1;

pub const MORE_DATA: &str = "Consider increasing data collection for more robust analysis";
pub const STALE_DATA: &str = "Data appears outdated - consider refreshing data sources";

/// Number of records strictly newer than one day before `now`.
pub fn recent_count(records: &[DataRecord], now: DateTime<Utc>) -> usize {
    let cutoff = now - Duration::days(1);
    records.iter().filter(|r| r.timestamp() > cutoff).count()
}

/// Derive the ordered list of recommendations, evaluated at `now`.
pub fn derive_recommendations(records: &[DataRecord], now: DateTime<Utc>) -> Vec<String> {
    let mut recommendations = Vec::new();

    if records.len() < MIN_RECORDS {
        recommendations.push(MORE_DATA.to_string());
    }

    if !records.is_empty() {
        let ratio = recent_count(records, now) as f64 / records.len() as f64;
        if ratio < MIN_RECENT_RATIO {
            recommendations.push(STALE_DATA.to_string());
        }
    }

    recommendations
}
