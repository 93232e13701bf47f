//! Pipeline execution: orchestration and the worker pool.

pub mod orchestrator;
pub mod pool;

pub use orchestrator::Pipeline;
