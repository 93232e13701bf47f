//! Analysis report generation.
//!
//! This module renders an [`AnalysisResult`] as plain text or JSON.

use crate::models::{AnalysisResult, Summary};
use anyhow::Result;

/// Generate a complete plain-text report.
pub fn generate_text_report(result: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Analysis completed in {}ms\n\n",
        result.processing_time_ms
    ));
    output.push_str(&generate_summary_section(&result.summary));
    output.push_str(&generate_list_section("Insights", &result.insights));
    output.push_str(&generate_list_section(
        "Recommendations",
        &result.recommendations,
    ));

    output
}

/// Generate the summary section.
fn generate_summary_section(summary: &Summary) -> String {
    let mut section = String::new();

    section.push_str("Summary:\n");
    for metric in Summary::METRICS {
        if let Some(value) = summary.get(metric) {
            section.push_str(&format!("  {:<14} {}\n", metric, value));
        }
    }
    section.push('\n');

    section
}

/// Generate a numbered list section, or a placeholder if empty.
fn generate_list_section(title: &str, items: &[String]) -> String {
    let mut section = String::new();

    section.push_str(&format!("{}:\n", title));
    if items.is_empty() {
        section.push_str("  (none)\n");
    }
    for (i, item) in items.iter().enumerate() {
        section.push_str(&format!("  {}. {}\n", i + 1, item));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(Into::into)
}
