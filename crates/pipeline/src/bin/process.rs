//! Load, clean, enrich, validate and save per-stock snapshot tables.

use anyhow::{Context, Result};
use clap::Parser;
use lob_core::Config;
use lob_pipeline::{Pipeline, TracingReporter};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "lob-process",
    version,
    about = "Clean order book snapshots and compute microstructure features"
)]
struct Cli {
    /// JSON configuration file (defaults apply to anything it omits)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root of the `<day>/<stock>.csv` tree
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory receiving processed tables
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Do not write data_report.json
    #[arg(long)]
    no_report: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data.base_path = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output.output_dir = dir;
    }
    if cli.no_report {
        config.output.write_report = false;
    }

    info!(data = %config.data.base_path.display(), "starting snapshot processing");
    let pipeline = Pipeline::new(config).context("Invalid configuration")?;
    let outcome = pipeline.run(&mut TracingReporter).context("Pipeline failed")?;

    let failed: Vec<&str> = outcome
        .validations
        .iter()
        .filter(|v| !v.passed())
        .map(|v| v.stock.as_str())
        .collect();
    if !failed.is_empty() {
        warn!(stocks = ?failed, "validation failed");
    }
    info!(
        stocks = outcome.processed.len(),
        files = outcome.written.len(),
        "done"
    );
    Ok(())
}
