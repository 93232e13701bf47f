//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.datapulse.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".datapulse.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Worker pool settings.
    #[serde(default)]
    pub pool: PoolConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Where to write the export snapshot, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
}

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of records generated on initialization.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Upper bound for one analysis attempt, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Extra analysis attempts after a failure or timeout.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// When false, only errors are logged.
    #[serde(default = "default_true")]
    pub enable_logging: bool,

    /// Seed for reproducible sample data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            enable_logging: true,
            seed: None,
        }
    }
}

fn default_batch_size() -> usize {
    1000
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

/// Worker pool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of tasks that may run concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// How long shutdown waits for in-flight tasks.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

fn default_workers() -> usize {
    10
}

fn default_shutdown_grace() -> u64 {
    60
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only explicitly provided values override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(count) = args.count {
            self.pipeline.batch_size = count;
        }
        if let Some(timeout_ms) = args.timeout_ms {
            self.pipeline.timeout_ms = timeout_ms;
        }
        if let Some(retries) = args.retries {
            self.pipeline.retry_attempts = retries;
        }
        if args.seed.is_some() {
            self.pipeline.seed = args.seed;
        }

        if let Some(workers) = args.workers {
            self.pool.workers = workers;
        }

        if let Some(ref export) = args.export {
            self.general.export_path = Some(export.display().to_string());
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Reject settings the pipeline cannot run with.
    ///
    /// Checked after merging, so values from the file are covered too.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.timeout_ms == 0 {
            bail!("pipeline.timeout_ms must be greater than 0");
        }
        if self.pool.workers == 0 {
            bail!("pool.workers must be greater than 0");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
