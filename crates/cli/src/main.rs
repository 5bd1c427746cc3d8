//! Gridstat CLI - zonal statistics by raster value

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use gridstat_core::io::read_geotiff;
use gridstat_core::{BlockIterator, Raster};
use gridstat_zonal::{
    ResampleMethod, ZonalParams, align_to_grid, write_zonal_table_to_path,
    zonal_statistics_parallel,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "gridstat")]
#[command(author, version, about = "Zonal statistics by raster value", long_about = None)]
struct Cli {
    /// Raster with integer zone identifiers
    zone_raster: PathBuf,

    /// Value raster to aggregate per zone
    value_raster: PathBuf,

    /// Resampling used to align the value raster: near, bilinear
    #[arg(short, long, default_value = "near")]
    interpolation_mode: String,

    /// Output CSV path (default: zonal_<value raster name>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Block edge size for the streaming aggregation
    #[arg(long, default_value = "256")]
    block_size: usize,

    /// Override the value raster's nodata sentinel
    #[arg(long)]
    value_nodata: Option<f64>,

    /// Override the zone raster's nodata sentinel
    #[arg(long)]
    zone_nodata: Option<i32>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// File name without directory or extension
fn base_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_method(s: &str) -> Result<ResampleMethod> {
    match s.to_lowercase().as_str() {
        "near" | "nearest" => Ok(ResampleMethod::Nearest),
        "bilinear" => Ok(ResampleMethod::Bilinear),
        _ => anyhow::bail!("Unknown interpolation mode: {}. Use near or bilinear.", s),
    }
}

fn read_zone_raster(path: &Path) -> Result<Raster<i32>> {
    let pb = spinner("Reading zone raster...");
    let raster: Raster<i32> = read_geotiff(path).context("Failed to read zone raster")?;
    pb.finish_and_clear();
    info!("Zones: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn read_value_raster(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading value raster...");
    let raster: Raster<f64> = read_geotiff(path).context("Failed to read value raster")?;
    pb.finish_and_clear();
    info!("Values: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let method = parse_method(&cli.interpolation_mode)?;
    let output = cli.output.unwrap_or_else(|| {
        PathBuf::from(format!("zonal_{}.csv", base_stem(&cli.value_raster)))
    });

    let mut zones = read_zone_raster(&cli.zone_raster)?;
    let mut values = read_value_raster(&cli.value_raster)?;

    if let Some(nodata) = cli.zone_nodata {
        zones.set_nodata(Some(nodata));
    }
    if let Some(nodata) = cli.value_nodata {
        values.set_nodata(Some(nodata));
    }

    info!(
        "aligning {} to {}",
        base_stem(&cli.value_raster),
        base_stem(&cli.zone_raster)
    );
    let pb = spinner("Aligning value raster...");
    let aligned = align_to_grid(&values, &zones, method).context("Failed to align value raster")?;
    pb.finish_and_clear();
    drop(values);

    let params = ZonalParams::with_block_size(cli.block_size);
    let (rows, cols) = zones.shape();
    let block_count =
        BlockIterator::new(rows, cols, cli.block_size, cli.block_size).count_windows();
    info!("collecting stats for {} raster blocks", block_count);

    let start = Instant::now();
    let table = zonal_statistics_parallel(&zones, &aligned, params)
        .context("Failed to aggregate zonal statistics")?;
    let elapsed = start.elapsed();

    info!("writing stats to {}", output.display());
    write_zonal_table_to_path(&output, &table).context("Failed to write zonal table")?;

    println!(
        "Zonal statistics for {} zones saved to: {}",
        table.len(),
        output.display()
    );
    println!("  Processing time: {:.2?}", elapsed);

    Ok(())
}
