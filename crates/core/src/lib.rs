//! # Gridstat Core
//!
//! Core types and I/O for the gridstat zonal-statistics tools.
//!
//! This crate provides:
//! - `Raster<T>`: Generic raster grid type
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `Crs`: Coordinate Reference System handling
//! - `BlockWindow` / `BlockIterator`: streaming access to raster sub-regions
//! - `BlockSource`: the read contract the aggregation core consumes
//! - GeoTIFF reading and writing

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::Crs;
pub use error::{Error, Result};
pub use raster::{BlockIterator, BlockSource, BlockWindow, GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{
        BlockIterator, BlockSource, BlockWindow, GeoTransform, Raster, RasterElement,
    };
}
