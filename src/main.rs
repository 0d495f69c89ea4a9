//! warpsim demo driver
//!
//! Builds a device from a preset or JSON config, runs a batch of warps and
//! prints the per-warp results followed by the device description.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use warpsim::config::DeviceConfig;
use warpsim::gpu::GpuDevice;
use warpsim::warp::{Instruction, Warp};

/// Simplified GPU execution simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Named device preset: reference | flagship
    #[arg(long, default_value = "reference")]
    preset: String,

    /// Device config JSON (overrides --preset)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Warp batch JSON: an array of warps, each an array of {"op","a","b"}
    #[arg(long, value_name = "FILE")]
    warps: Option<PathBuf>,

    /// Drain clusters concurrently
    #[arg(long)]
    parallel: bool,

    /// Publish live metrics for the viz binary
    #[arg(long)]
    live: bool,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = match &args.config {
        Some(path) => DeviceConfig::from_json_file(path)
            .with_context(|| format!("failed to load device config {:?}", path))?,
        None => DeviceConfig::preset(&args.preset)?,
    };
    let config = DeviceConfig {
        parallel: config.parallel || args.parallel,
        live_metrics: config.live_metrics || args.live,
        ..config
    };

    let warps = match &args.warps {
        Some(path) => load_warps(path)?,
        None => demo_warps(),
    };

    let mut gpu = GpuDevice::new(config).context("failed to build device")?;
    println!(
        "Initialized '{}' with {} clusters × {} cores, {}KB memory",
        gpu.name(),
        gpu.clusters().len(),
        gpu.snapshot().cores_per_cluster,
        gpu.memory().size_bytes() / 1024,
    );

    let results = gpu.load_instructions(warps).context("batch failed")?;
    for (i, warp_results) in results.iter().enumerate() {
        println!("warp {:>3} → {:?}", i, warp_results);
    }

    println!("{}", serde_json::to_string_pretty(&gpu.describe())?);
    Ok(())
}

fn load_warps(path: &PathBuf) -> Result<Vec<Warp>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read warp batch {:?}", path))?;
    serde_json::from_str(&data).with_context(|| format!("invalid warp batch {:?}", path))
}

/// Two warps: doubling by addition, then by multiplication.
fn demo_warps() -> Vec<Warp> {
    vec![
        (0..4).map(|i| Instruction::add(i, i)).collect(),
        (0..4).map(|i| Instruction::mul(i, 2)).collect(),
    ]
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
