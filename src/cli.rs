//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// DataPulse - in-memory analytics demo
///
/// Generates a batch of synthetic records, computes summary statistics,
/// and prints insights and recommendations.
///
/// Examples:
///   datapulse
///   datapulse --count 50 --seed 7
///   datapulse --format json --output result.json --export records.json
///   datapulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Number of sample records to generate
    ///
    /// Overrides `pipeline.batch_size` from the config file (default 1000).
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub count: Option<usize>,

    /// Number of worker tasks that may run concurrently
    #[arg(short, long, value_name = "NUM", env = "DATAPULSE_WORKERS")]
    pub workers: Option<usize>,

    /// Seed for reproducible sample data
    #[arg(long, value_name = "SEED", env = "DATAPULSE_SEED")]
    pub seed: Option<u64>,

    /// Timeout for one analysis attempt in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Extra analysis attempts after a failure
    #[arg(long, value_name = "COUNT")]
    pub retries: Option<u32>,

    /// Output format for the analysis result (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the analysis result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write an export of all records as JSON
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .datapulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .datapulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.workers == Some(0) {
            return Err("Workers must be at least 1".to_string());
        }

        if self.timeout_ms == Some(0) {
            return Err("Timeout must be at least 1 millisecond".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(output), Some(export)) = (&self.output, &self.export) {
            if output == export {
                return Err("--output and --export must be different files".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// With logging disabled in the config, only errors are shown.
    pub fn log_level(&self, enable_logging: bool) -> tracing::Level {
        if self.quiet || !enable_logging {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
