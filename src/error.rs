//! Error types for the pipeline.

use thiserror::Error;

/// Boxed error carried as the cause of a wrapped failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the pipeline and its worker pool.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Analysis failed; the original cause is kept as the source.
    #[error("Data processing failed")]
    ProcessingFailed {
        #[source]
        source: BoxError,
    },

    /// Sample generation failed.
    #[error("Sample generation failed")]
    GenerationFailed {
        #[source]
        source: BoxError,
    },

    /// An analysis attempt ran longer than the configured timeout.
    #[error("Processing timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Worker pool is shut down")]
    PoolShutDown,

    /// The task was force-terminated before it produced a result.
    #[error("Task was aborted before completion")]
    TaskAborted,

    /// The graceful shutdown wait was interrupted; stragglers were aborted.
    #[error("Shutdown interrupted; {aborted} task(s) force-terminated")]
    ShutdownInterrupted { aborted: usize },
}

impl PipelineError {
    pub fn processing(source: impl Into<BoxError>) -> Self {
        PipelineError::ProcessingFailed {
            source: source.into(),
        }
    }

    pub fn generation(source: impl Into<BoxError>) -> Self {
        PipelineError::GenerationFailed {
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_processing_failed_keeps_cause() {
        let err = PipelineError::processing("division went sideways");

        assert_eq!(err.to_string(), "Data processing failed");
        let source = err.source().expect("cause should be attached");
        assert_eq!(source.to_string(), "division went sideways");
    }

    #[test]
    fn test_timeout_message() {
        let err = PipelineError::Timeout { timeout_ms: 250 };
        assert_eq!(err.to_string(), "Processing timed out after 250ms");
    }
}
