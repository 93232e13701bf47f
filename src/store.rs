//! Append-only record storage.
//!
//! The store owns every generated record. Writers append under a short
//! write lock; readers take a [`Snapshot`], which shares the backing
//! vector until the next append forces a copy.

use crate::models::DataRecord;
use parking_lot::RwLock;
use std::ops::Deref;
use std::sync::Arc;

/// Point-in-time, immutable view of the store.
#[derive(Debug, Clone, Default)]
pub struct Snapshot(Arc<Vec<DataRecord>>);

impl Snapshot {
    pub fn records(&self) -> &[DataRecord] {
        &self.0
    }
}

impl Deref for Snapshot {
    type Target = [DataRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Thread-safe, append-only collection of records.
///
/// Cloning a `RecordStore` yields another handle to the same storage.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Arc<RwLock<Arc<Vec<DataRecord>>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the end of the store.
    pub fn add(&self, record: DataRecord) {
        let mut guard = self.records.write();
        // Clones the vector only if a snapshot still references it.
        Arc::make_mut(&mut *guard).push(record);
    }

    /// Take an immutable snapshot of the current contents.
    pub fn snapshot(&self) -> Snapshot {
        let guard = self.records.read();
        Snapshot(Arc::clone(&*guard))
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
