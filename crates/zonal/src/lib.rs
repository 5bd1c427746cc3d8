//! # Gridstat Zonal
//!
//! Streaming zonal statistics: per-zone min, max, count, sum and mean of a
//! continuous value raster, grouped by an integer zone raster sharing the
//! same grid.
//!
//! The aggregation reads both rasters block by block through the
//! [`BlockSource`](gridstat_core::BlockSource) contract, so resident memory
//! is bounded by the block size plus one accumulator per distinct zone.
//!
//! This crate also carries the two collaborators the aggregation needs to
//! form a complete pipeline: a grid aligner that resamples a value raster
//! onto the zone raster's grid, and a CSV writer for the result table.

pub mod accumulator;
pub mod aggregate;
pub mod align;
pub mod table;

pub use accumulator::{AccumulatorTable, ZonalRow, ZoneAccumulator};
#[cfg(feature = "parallel")]
pub use aggregate::zonal_statistics_parallel;
pub use aggregate::{ZonalParams, zonal_statistics};
pub use align::{ResampleMethod, align_to_grid};
pub use table::{TABLE_HEADER, write_zonal_table, write_zonal_table_to_path};
