//! Export of the store contents for external consumption.

use crate::models::DataRecord;
use crate::store::RecordStore;
use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Version string stamped into every export.
pub const SYSTEM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format of the `exportTime` field.
pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A point-in-time export of all records plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub data: Vec<DataRecord>,
    pub export_time: String,
    pub record_count: usize,
    pub system_version: String,
}

/// Export the current contents of `store`. The store is left untouched.
pub fn export(store: &RecordStore) -> ExportSnapshot {
    let snapshot = store.snapshot();

    ExportSnapshot {
        record_count: snapshot.len(),
        data: snapshot.to_vec(),
        export_time: Utc::now().format(EXPORT_TIME_FORMAT).to_string(),
        system_version: SYSTEM_VERSION.to_string(),
    }
}

impl ExportSnapshot {
    /// The export as a plain JSON object.
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!("export serialized to a non-object: {}", other),
        }
    }

    /// Write the export as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.to_map()?)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
