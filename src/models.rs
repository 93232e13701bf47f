//! Data models for the analytics pipeline.
//!
//! This module contains the core data structures used throughout
//! the application for representing records, summaries, and results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key holding the record category.
pub const CATEGORY_KEY: &str = "category";
/// Metadata key holding the record priority.
pub const PRIORITY_KEY: &str = "priority";
/// Metadata key holding the record origin.
pub const SOURCE_KEY: &str = "source";

/// A scalar value stored in record metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl MetadataValue {
    /// Returns the text if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Integer` value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Text(s) => write!(f, "{}", s),
            MetadataValue::Integer(i) => write!(f, "{}", i),
            MetadataValue::Float(v) => write!(f, "{}", v),
            MetadataValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Integer(i)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Float(v)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

/// Record metadata, keyed by name.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A single synthetic data point.
///
/// Fields are private; once constructed a record never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    id: String,
    timestamp: DateTime<Utc>,
    value: f64,
    metadata: Metadata,
}

impl DataRecord {
    /// Creates a new record, taking ownership of its metadata.
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        value: f64,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            value,
            metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Read-only view of the metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The `category` metadata entry, if present and textual.
    pub fn category(&self) -> Option<&str> {
        self.metadata.get(CATEGORY_KEY).and_then(MetadataValue::as_str)
    }

    /// The `priority` metadata entry, if present and integral.
    #[allow(dead_code)] // Accessor mirroring category(); generator tests use it
    pub fn priority(&self) -> Option<i64> {
        self.metadata.get(PRIORITY_KEY).and_then(MetadataValue::as_i64)
    }
}

impl fmt::Display for DataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataRecord{{id='{}', timestamp={}, value={:.2}}}",
            self.id,
            self.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            self.value
        )
    }
}

/// Aggregate statistics over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of records, as a float to match the other metrics.
    pub total_records: f64,
    /// Mean value rounded to two decimals.
    pub average_value: f64,
    pub max_value: f64,
    pub min_value: f64,
}

impl Summary {
    /// Metric names in display order.
    pub const METRICS: [&'static str; 4] =
        ["totalRecords", "averageValue", "maxValue", "minValue"];

    /// Looks a metric up by its name.
    pub fn get(&self, metric: &str) -> Option<f64> {
        match metric {
            "totalRecords" => Some(self.total_records),
            "averageValue" => Some(self.average_value),
            "maxValue" => Some(self.max_value),
            "minValue" => Some(self.min_value),
            _ => None,
        }
    }

    /// Returns the summary as a metric name to value map.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        Self::METRICS
            .iter()
            .filter_map(|name| self.get(name).map(|v| (name.to_string(), v)))
            .collect()
    }
}

/// Outcome of one processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: Summary,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub processing_time_ms: u64,
}
