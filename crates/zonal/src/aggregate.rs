//! Streaming block-wise zonal aggregation
//!
//! Reads matching blocks from a zone grid and a value grid aligned to the
//! same extent, masks invalid pixels, and folds the survivors into per-zone
//! running statistics. Block processing order does not affect the result.

use crate::accumulator::{AccumulatorTable, ZonalRow};
use gridstat_core::raster::{BlockIterator, BlockSource, BlockWindow};
use gridstat_core::{Error, Result};
use ndarray::Zip;

// Tolerance for matching a value against the value-raster nodata sentinel.
// Resampled rasters accrue floating error, so the comparison mirrors
// numpy.isclose: |a - nd| <= atol + rtol * |nd|.
const NODATA_RTOL: f64 = 1e-5;
const NODATA_ATOL: f64 = 1e-8;

fn is_nodata_close(value: f64, nodata: f64) -> bool {
    (value - nodata).abs() <= NODATA_ATOL + NODATA_RTOL * nodata.abs()
}

/// Parameters for the aggregation
#[derive(Debug, Clone, Copy)]
pub struct ZonalParams {
    /// Block height in rows
    pub block_rows: usize,
    /// Block width in columns
    pub block_cols: usize,
}

impl Default for ZonalParams {
    fn default() -> Self {
        Self {
            block_rows: 256,
            block_cols: 256,
        }
    }
}

impl ZonalParams {
    /// Square-block convenience constructor
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_rows: block_size,
            block_cols: block_size,
        }
    }
}

/// Compute zonal statistics by streaming blocks sequentially.
///
/// For every distinct zone id in `zones`, accumulates min, max, count and
/// sum of the valid `values` pixels at the same coordinates, then derives
/// the mean. A pixel is valid when its value is not the value nodata
/// (within floating tolerance, NaN always invalid) and its zone is not the
/// zone nodata (exact match). Rows come back sorted by ascending zone id;
/// zero observed zones produce an empty vector, not an error.
///
/// # Arguments
/// * `zones` - Integer zone grid
/// * `values` - Value grid on the same extent, pixel-for-pixel
/// * `params` - Block size for streaming
///
/// # Errors
/// `ShapeMismatch` when the grids disagree on dimensions (checked before
/// any block is read); any block read failure aborts the run.
pub fn zonal_statistics<Z, V>(zones: &Z, values: &V, params: ZonalParams) -> Result<Vec<ZonalRow>>
where
    Z: BlockSource<Value = i32>,
    V: BlockSource<Value = f64>,
{
    let windows = check_preconditions(zones, values, &params)?;
    let zone_nodata = zones.nodata();
    let value_nodata = values.nodata();

    let mut table = AccumulatorTable::new();
    for window in windows {
        fold_block(zones, values, &window, zone_nodata, value_nodata, &mut table)?;
    }

    Ok(table.into_rows())
}

/// Compute zonal statistics with blocks processed on a rayon thread pool.
///
/// Each worker folds its blocks into a private partial table; partials are
/// merged at the end (min of mins, max of maxes, additive count and sum).
/// Produces the same rows as [`zonal_statistics`] up to floating-point
/// summation order.
#[cfg(feature = "parallel")]
pub fn zonal_statistics_parallel<Z, V>(
    zones: &Z,
    values: &V,
    params: ZonalParams,
) -> Result<Vec<ZonalRow>>
where
    Z: BlockSource<Value = i32> + Sync,
    V: BlockSource<Value = f64> + Sync,
{
    use rayon::prelude::*;

    let windows: Vec<BlockWindow> = check_preconditions(zones, values, &params)?.collect();
    let zone_nodata = zones.nodata();
    let value_nodata = values.nodata();

    let partials: Result<Vec<AccumulatorTable>> = windows
        .par_iter()
        .map(|window| {
            let mut partial = AccumulatorTable::new();
            fold_block(zones, values, window, zone_nodata, value_nodata, &mut partial)?;
            Ok(partial)
        })
        .collect();

    let mut table = AccumulatorTable::new();
    for partial in partials? {
        table.merge(partial);
    }

    Ok(table.into_rows())
}

/// Verify the grids share a shape and the block size is usable, and build
/// the window sequence covering the common extent.
fn check_preconditions<Z, V>(zones: &Z, values: &V, params: &ZonalParams) -> Result<BlockIterator>
where
    Z: BlockSource<Value = i32>,
    V: BlockSource<Value = f64>,
{
    let (zone_rows, zone_cols) = zones.shape();
    let (value_rows, value_cols) = values.shape();

    if zone_rows != value_rows || zone_cols != value_cols {
        return Err(Error::ShapeMismatch {
            zone_rows,
            zone_cols,
            value_rows,
            value_cols,
        });
    }

    if params.block_rows == 0 || params.block_cols == 0 {
        return Err(Error::InvalidParameter {
            name: "block_size",
            value: format!("{}x{}", params.block_rows, params.block_cols),
            reason: "block dimensions must be non-zero".into(),
        });
    }

    Ok(BlockIterator::new(
        zone_rows,
        zone_cols,
        params.block_rows,
        params.block_cols,
    ))
}

/// Read one window from both grids and fold its valid pixels into `table`
fn fold_block<Z, V>(
    zones: &Z,
    values: &V,
    window: &BlockWindow,
    zone_nodata: Option<i32>,
    value_nodata: Option<f64>,
    table: &mut AccumulatorTable,
) -> Result<()>
where
    Z: BlockSource<Value = i32>,
    V: BlockSource<Value = f64>,
{
    let zone_block = zones.read_block(window)?;
    let value_block = values.read_block(window)?;

    Zip::from(&zone_block).and(&value_block).for_each(|&zone, &value| {
        if zone_nodata.is_some_and(|nd| zone == nd) {
            return;
        }
        if value.is_nan() {
            return;
        }
        if value_nodata.is_some_and(|nd| is_nodata_close(value, nd)) {
            return;
        }
        table.entry(zone).fold(value);
    });

    Ok(())
}
