//! Synthetic record generation.

use crate::models::{DataRecord, Metadata, CATEGORY_KEY, PRIORITY_KEY, SOURCE_KEY};
use crate::store::RecordStore;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Categories a generated record may fall into.
pub const CATEGORIES: [&str; 3] = ["A", "B", "C"];

/// Upper bound (exclusive) for generated values.
pub const MAX_VALUE: f64 = 1000.0;

/// Source tag written into every generated record.
pub const GENERATED_SOURCE: &str = "generated";

/// Timestamps fall within this window before "now".
const TIMESTAMP_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Produces synthetic records and appends them to a store.
pub struct SampleGenerator<R> {
    store: RecordStore,
    rng: R,
}

impl SampleGenerator<StdRng> {
    /// Create a generator with a seeded RNG, or an OS-seeded one.
    pub fn with_seed(store: RecordStore, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(store, rng)
    }
}

impl<R: Rng> SampleGenerator<R> {
    pub fn new(store: RecordStore, rng: R) -> Self {
        Self { store, rng }
    }

    /// Generate `count` records relative to the current time.
    ///
    /// Returns the number of records appended.
    pub fn generate(&mut self, count: usize) -> usize {
        self.generate_at(count, Utc::now())
    }

    /// Generate `count` records with timestamps in the 24h before `now`.
    pub fn generate_at(&mut self, count: usize, now: DateTime<Utc>) -> usize {
        for i in 0..count {
            let record = self.next_record(i + 1, now);
            self.store.add(record);
        }

        debug!(count, total = self.store.len(), "generated sample records");
        count
    }

    fn next_record(&mut self, n: usize, now: DateTime<Utc>) -> DataRecord {
        let category = CATEGORIES.choose(&mut self.rng).copied().unwrap_or("A");

        let mut metadata = Metadata::new();
        metadata.insert(CATEGORY_KEY.to_string(), category.into());
        metadata.insert(
            PRIORITY_KEY.to_string(),
            self.rng.random_range(1..=5i64).into(),
        );
        metadata.insert(SOURCE_KEY.to_string(), GENERATED_SOURCE.into());

        let offset = Duration::milliseconds(self.rng.random_range(0..TIMESTAMP_WINDOW_MS));
        let value = self.rng.random_range(0.0..MAX_VALUE);

        DataRecord::new(format!("record-{}", n), now - offset, value, metadata)
    }
}
