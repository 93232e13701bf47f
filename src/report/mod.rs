//! Report rendering for analysis results.

mod generator;

pub use generator::{generate_json_report, generate_text_report};
