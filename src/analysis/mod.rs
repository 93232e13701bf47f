//! Analysis modules.
//!
//! Aggregation, insights and recommendations all run over one
//! consistent slice of records.

pub mod aggregator;
pub mod insights;
pub mod recommendations;

pub use aggregator::summarize;
pub use insights::derive_insights;
pub use recommendations::derive_recommendations;

use crate::models::{AnalysisResult, DataRecord};
use chrono::{DateTime, Utc};
use std::time::Instant;

/// Run the full analysis over `records`, timing the whole sequence.
pub fn analyze(records: &[DataRecord], now: DateTime<Utc>) -> AnalysisResult {
    let start = Instant::now();

    let summary = summarize(records);
    let insights = derive_insights(records);
    let recommendations = derive_recommendations(records, now);

    AnalysisResult {
        summary,
        insights,
        recommendations,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}
