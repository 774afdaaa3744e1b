//! Center-of-mass analysis command line tool.
//!
//! Reads reduction maps from a JSON file, computes the shift field and its
//! derived maps and writes images, raw data and a summary to a directory.

mod export;
mod input;

use anyhow::{Context, Result};
use clap::Parser;
use com_analysis::{AnalysisConfig, ComAnalysis};
use com_common::ComParameters;
use renderer::Colormap;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::input::AnalysisInput;

#[derive(Parser, Debug)]
#[command(name = "com-cli")]
#[command(about = "Center-of-mass vector field analysis of reduction maps")]
struct Args {
    /// JSON file with dataset shape, parameters and reduction maps
    input: PathBuf,

    /// Directory for images, raw data and summary.json
    #[arg(short, long, default_value = "com-results", env = "COM_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// ROI center column (overrides the input file)
    #[arg(long)]
    cx: Option<f64>,

    /// ROI center row (overrides the input file)
    #[arg(long)]
    cy: Option<f64>,

    /// ROI radius (overrides the input file)
    #[arg(long)]
    r: Option<f64>,

    /// Colormap for scalar maps
    #[arg(long, env = "COM_COLORMAP")]
    colormap: Option<String>,

    /// Log-scale scalar maps
    #[arg(long)]
    log_scale: bool,

    /// Log level
    #[arg(long, default_value = "info", env = "COM_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let mut config = AnalysisConfig::from_env();
    if let Some(name) = &args.colormap {
        config.colormap = Colormap::from_str(name);
    }
    config.logarithmic |= args.log_scale;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid analysis configuration: {}", e))?;

    let input = AnalysisInput::load(&args.input)?;
    info!(
        input = %args.input.display(),
        nav = ?input.nav_shape,
        sig = ?input.sig_shape,
        dtype = input.maps.dtype(),
        "Loaded reduction maps"
    );

    let overrides = ComParameters {
        cx: args.cx,
        cy: args.cy,
        r: args.r,
        use_sparse: None,
    };
    let params = input.parameters_with(&overrides);
    let analysis = ComAnalysis::new(input.dataset_shape(), &params)
        .context("Failed to set up analysis")?
        .with_config(config);

    let results = input.analyze(&analysis)?;
    let summary = export::write_results(&results, analysis.parameters(), &args.output_dir)?;

    info!(
        results = summary.results.len(),
        output = %args.output_dir.display(),
        "Analysis complete"
    );
    Ok(())
}
