//! Floor-plan heatmap generator.
//!
//! Reads a measurement log and renders a download, upload and ping heatmap
//! for every floor that has enough samples.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use heatmap_common::MeasurementLog;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use heatmap_gen::{load_config, run_to_directory, summarize};

#[derive(Parser, Debug)]
#[command(name = "heatmap-gen")]
#[command(about = "Generate floor-plan heatmaps from network speed measurements")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Measurement log (JSON)
    #[arg(long, env = "HEATMAP_DATA", default_value = "data/wifi_measurements.json", global = true)]
    data: PathBuf,

    /// Directory for generated images
    #[arg(long, env = "HEATMAP_OUTPUT_DIR", default_value = "output", global = true)]
    output_dir: PathBuf,

    /// Rendering configuration (YAML)
    #[arg(long, env = "HEATMAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Render every floor and metric
    Generate,
    /// Print per-floor measurement statistics
    Summary,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_tracing(&args.log_level, args.json_logs)?;

    let log = MeasurementLog::from_file(&args.data)
        .with_context(|| format!("No usable measurement log at {}", args.data.display()))?;

    info!(
        data = %args.data.display(),
        floors = log.floors().len(),
        samples = log.total_samples(),
        "Loaded measurement log"
    );

    match args.command {
        Some(Command::Summary) => print_summary(&log),
        Some(Command::Generate) => generate(&args, &log)?,
        None => {
            print_summary(&log);
            generate(&args, &log)?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

fn print_summary(log: &MeasurementLog) {
    let summaries = summarize(log);
    if summaries.is_empty() {
        println!("No measurements recorded.");
        return;
    }

    println!("Measurement summary");
    for summary in summaries {
        println!("{}", summary);
    }
}

fn generate(args: &Args, log: &MeasurementLog) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let report = run_to_directory(log, &config, &args.output_dir).with_context(|| {
        format!(
            "Failed to prepare output directory {}",
            args.output_dir.display()
        )
    })?;

    println!("Heatmaps in {}", args.output_dir.display());
    println!("{}", report);

    Ok(())
}
