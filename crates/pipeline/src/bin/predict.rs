//! Apply the baseline model to every CSV file in a directory.

use anyhow::{Context, Result};
use clap::Parser;
use lob_core::config::PredictorConfig;
use lob_pipeline::{predict_directory, BaselineModel};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "lob-predict",
    version,
    about = "Write Time/Predict files using the AskVolume1 + BidVolume1 baseline"
)]
struct Cli {
    /// Directory of test CSV files
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory receiving prediction files
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let defaults = PredictorConfig::default();
    let input = cli.input.unwrap_or(defaults.input_dir);
    let output = cli.output.unwrap_or(defaults.output_dir);

    let files = predict_directory(&BaselineModel, &input, &output)
        .with_context(|| format!("Failed to predict files under {}", input.display()))?;

    info!(files = files.len(), output = %output.display(), "done");
    Ok(())
}
