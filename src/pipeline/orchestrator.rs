//! Pipeline orchestration.
//!
//! The pipeline owns the record store and a worker pool. `initialize`
//! generates the sample batch; `process` analyzes one snapshot of the
//! store. Both run on the pool and hand back a [`TaskHandle`].

use super::pool::{TaskHandle, WorkerPool};
use crate::analysis;
use crate::config::{PipelineConfig, PoolConfig};
use crate::error::{BoxError, PipelineError};
use crate::export::{self, ExportSnapshot};
use crate::generator::SampleGenerator;
use crate::models::{AnalysisResult, DataRecord};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::task;
use tracing::{debug, info, warn};

/// Analysis function run against each snapshot.
pub type Analyzer = fn(&[DataRecord], DateTime<Utc>) -> AnalysisResult;

/// The analytics pipeline.
pub struct Pipeline {
    store: RecordStore,
    config: PipelineConfig,
    pool: WorkerPool,
    shutdown_grace: Duration,
    analyzer: Analyzer,
}

impl Pipeline {
    /// Create a pipeline with an empty store.
    pub fn new(config: PipelineConfig, pool: &PoolConfig) -> Self {
        let shutdown_grace = Duration::from_secs(pool.shutdown_grace_secs);
        let pool = WorkerPool::new(pool.workers);
        info!(
            batch_size = config.batch_size,
            timeout_ms = config.timeout_ms,
            retry_attempts = config.retry_attempts,
            workers = pool.workers(),
            "creating pipeline"
        );

        Self {
            store: RecordStore::new(),
            config,
            pool,
            shutdown_grace,
            analyzer: analysis::analyze,
        }
    }

    /// Replace the analysis function.
    #[cfg(test)]
    pub fn with_analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generate the configured batch of sample records on the pool.
    ///
    /// The handle resolves to the store size once generation finished.
    pub fn initialize(&self) -> Result<TaskHandle<usize>, PipelineError> {
        let store = self.store.clone();
        let count = self.config.batch_size;
        let seed = self.config.seed;

        self.pool.submit(async move {
            info!("Initializing pipeline with {} sample records", count);

            let total = task::spawn_blocking(move || {
                SampleGenerator::with_seed(store.clone(), seed).generate(count);
                store.len()
            })
            .await
            .map_err(PipelineError::generation)?;

            info!(records = total, "Pipeline initialized");
            Ok(total)
        })
    }

    /// Analyze a snapshot of the store on the pool.
    ///
    /// Each attempt is bounded by `timeout_ms` and retried up to
    /// `retry_attempts` times. Once all attempts fail the last cause is
    /// reported as [`PipelineError::ProcessingFailed`].
    pub fn process(&self) -> Result<TaskHandle<AnalysisResult>, PipelineError> {
        let store = self.store.clone();
        let analyzer = self.analyzer;
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let attempts = self.config.retry_attempts + 1;

        self.pool.submit(async move {
            let mut cause: BoxError = "no analysis attempt was made".into();

            for attempt in 1..=attempts {
                let store = store.clone();
                let job = task::spawn_blocking(move || {
                    let snapshot = store.snapshot();
                    debug!(records = snapshot.len(), "analyzing snapshot");
                    analyzer(snapshot.records(), Utc::now())
                });

                match tokio::time::timeout(timeout, job).await {
                    Ok(Ok(result)) => {
                        info!(
                            attempt,
                            elapsed_ms = result.processing_time_ms,
                            insights = result.insights.len(),
                            recommendations = result.recommendations.len(),
                            "Analysis completed"
                        );
                        return Ok(result);
                    }
                    Ok(Err(e)) => {
                        warn!(attempt, attempts, "Analysis attempt failed: {}", e);
                        cause = Box::new(e);
                    }
                    Err(_) => {
                        warn!(attempt, attempts, "Analysis attempt timed out");
                        cause = Box::new(PipelineError::Timeout {
                            timeout_ms: timeout.as_millis() as u64,
                        });
                    }
                }
            }

            Err(PipelineError::processing(cause))
        })
    }

    /// Snapshot the store and export metadata. Does not modify the store.
    pub fn export(&self) -> ExportSnapshot {
        export::export(&self.store)
    }

    /// Stop accepting work and drain the pool within the grace period.
    pub async fn shutdown(&self) -> Result<(), PipelineError> {
        self.pool.shutdown(self.shutdown_grace).await
    }

    /// Like [`Pipeline::shutdown`], aborting early once `interrupt` resolves.
    #[cfg(test)]
    pub async fn shutdown_until<I>(&self, interrupt: I) -> Result<(), PipelineError>
    where
        I: std::future::Future,
    {
        self.pool.shutdown_until(self.shutdown_grace, interrupt).await
    }
}
