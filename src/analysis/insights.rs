//! Descriptive insights over the record distribution.

use super::aggregator::{mean, round_to};
use crate::models::DataRecord;
use std::collections::BTreeMap;

/// Category label used for records without a textual category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Values above `average * HIGH_VALUE_FACTOR` count as significantly high.
pub const HIGH_VALUE_FACTOR: f64 = 1.5;

/// Count records per category, keyed in lexicographic order.
pub fn category_distribution(records: &[DataRecord]) -> BTreeMap<String, usize> {
    let mut dist: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        let category = record.category().unwrap_or(UNKNOWN_CATEGORY);
        *dist.entry(category.to_string()).or_default() += 1;
    }

    dist
}

/// The category with the strictly greatest count.
///
/// Ties go to the lexicographically smallest category. Returns `None`
/// for an empty distribution.
pub fn dominant_category(dist: &BTreeMap<String, usize>) -> Option<(&str, usize)> {
    let mut best: Option<(&str, usize)> = None;

    for (category, &count) in dist {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((category.as_str(), count)),
        }
    }

    best
}

/// Number of records whose value exceeds 150% of the mean.
pub fn high_value_count(records: &[DataRecord]) -> usize {
    let threshold = mean(records) * HIGH_VALUE_FACTOR;
    records.iter().filter(|r| r.value() > threshold).count()
}

/// Derive the ordered list of insights for a set of records.
pub fn derive_insights(records: &[DataRecord]) -> Vec<String> {
    let mut insights = Vec::new();

    // Skipped for empty input: there is no share to report.
    let dist = category_distribution(records);
    if let Some((category, count)) = dominant_category(&dist) {
        // Halves round away from zero, as the summary metrics do.
        let percentage = round_to(count as f64 * 100.0 / records.len() as f64, 1);
        insights.push(format!(
            "Category '{}' represents {:.1}% of all data",
            category, percentage
        ));
    }

    let high = high_value_count(records);
    if high > 0 {
        insights.push(format!(
            "{} records show significantly high values (>150% of average)",
            high
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metadata, CATEGORY_KEY};
    use chrono::Utc;

    fn record(category: Option<&str>, value: f64) -> DataRecord {
        let mut metadata = Metadata::new();
        if let Some(category) = category {
            metadata.insert(CATEGORY_KEY.to_string(), category.into());
        }
        DataRecord::new("record", Utc::now(), value, metadata)
    }

    #[test]
    fn test_single_category() {
        let records: Vec<_> = (0..10).map(|_| record(Some("A"), 5.0)).collect();
        let insights = derive_insights(&records);

        assert_eq!(insights[0], "Category 'A' represents 100.0% of all data");
        // Identical values: nothing exceeds 150% of the mean.
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_no_insights() {
        assert!(derive_insights(&[]).is_empty());
    }

    #[test]
    fn test_percentage_one_decimal() {
        let records = vec![
            record(Some("B"), 1.0),
            record(Some("B"), 1.0),
            record(Some("C"), 1.0),
        ];
        let insights = derive_insights(&records);

        assert_eq!(insights[0], "Category 'B' represents 66.7% of all data");
    }

    #[test]
    fn test_percentage_half_rounds_up() {
        // 137 of 400 is exactly 34.25%.
        let records: Vec<_> = std::iter::repeat_with(|| record(Some("A"), 1.0))
            .take(137)
            .chain(std::iter::repeat_with(|| record(Some("B"), 1.0)).take(132))
            .chain(std::iter::repeat_with(|| record(Some("C"), 1.0)).take(131))
            .collect();
        let insights = derive_insights(&records);

        assert_eq!(insights[0], "Category 'A' represents 34.3% of all data");
    }

    #[test]
    fn test_tie_breaks_lexicographically() {
        let records = vec![
            record(Some("C"), 1.0),
            record(Some("B"), 1.0),
            record(Some("C"), 1.0),
            record(Some("B"), 1.0),
        ];
        let dist = category_distribution(&records);

        assert_eq!(dominant_category(&dist), Some(("B", 2)));
    }

    #[test]
    fn test_missing_category_counts_as_unknown() {
        let records = vec![record(None, 1.0), record(None, 1.0), record(Some("A"), 1.0)];
        let insights = derive_insights(&records);

        assert_eq!(insights[0], "Category 'Unknown' represents 66.7% of all data");
    }

    #[test]
    fn test_high_value_insight_follows_category_insight() {
        // Mean is 25; threshold 37.5; only 100 exceeds it.
        let records = vec![
            record(Some("A"), 0.0),
            record(Some("A"), 0.0),
            record(Some("B"), 0.0),
            record(Some("B"), 100.0),
        ];
        let insights = derive_insights(&records);

        assert_eq!(insights.len(), 2);
        assert!(insights[0].starts_with("Category 'A'"));
        assert_eq!(
            insights[1],
            "1 records show significantly high values (>150% of average)"
        );
    }

    #[test]
    fn test_value_at_threshold_is_not_high() {
        // Mean is 20; threshold 30 exactly.
        let records = vec![
            record(Some("A"), 0.0),
            record(Some("A"), 30.0),
            record(Some("A"), 30.0),
        ];

        assert_eq!(high_value_count(&records), 0);
    }
}
