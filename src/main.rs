//! DataPulse - in-memory analytics demo
//!
//! Generates synthetic records on a bounded worker pool, computes
//! summary statistics over a snapshot, and reports insights and
//! recommendations.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, processing failure, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod export;
mod generator;
mod models;
mod pipeline;
mod report;
mod store;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use pipeline::Pipeline;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides whether logging is enabled, so load it first
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    init_logging(&args, &config);

    info!("DataPulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(args, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .datapulse.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    // `verbose = true` in the config file also raises INFO to DEBUG
    let level = match args.log_level(config.pipeline.enable_logging) {
        level if level == tracing::Level::INFO && config.general.verbose => tracing::Level::DEBUG,
        level => level,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the pipeline and always shut the worker pool down afterwards.
async fn run(args: Args, config: Config) -> Result<()> {
    let pipeline = Pipeline::new(config.pipeline.clone(), &config.pool);

    let outcome = run_pipeline(&pipeline, &args, &config).await;

    let shutdown = pipeline.shutdown().await;
    if let Err(ref e) = shutdown {
        warn!("Shutdown did not complete cleanly: {}", e);
    }

    outcome?;
    shutdown.context("Worker pool shutdown failed")?;
    Ok(())
}

/// Initialize, process, render, and optionally export.
async fn run_pipeline(pipeline: &Pipeline, args: &Args, config: &Config) -> Result<()> {
    info!("Generating {} sample records", pipeline.config().batch_size);
    let total = pipeline
        .initialize()?
        .await
        .context("Pipeline initialization failed")?;
    info!("Store holds {} records", total);
    if pipeline.store().is_empty() {
        warn!("No records generated; the analysis will report default values");
    }

    let result = pipeline
        .process()?
        .await
        .context("Pipeline processing failed")?;
    debug!("Summary: {:?}", result.summary.to_map());

    let rendered = match args.format {
        OutputFormat::Json => report::generate_json_report(&result)?,
        OutputFormat::Text => report::generate_text_report(&result),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write result to {}", path.display()))?;
            info!("Result written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    if let Some(ref export_path) = config.general.export_path {
        let path = Path::new(export_path);
        let snapshot = pipeline.export();
        snapshot
            .write_json(path)
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
        info!(
            records = snapshot.record_count,
            "Export written to {}",
            path.display()
        );
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("Warning: ignoring unreadable {}: {:#}", config::DEFAULT_CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
