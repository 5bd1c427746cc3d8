//! Error types for gridstat

use thiserror::Error;

/// Main error type for gridstat operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error(
        "Grid shape mismatch: zone raster is ({zone_rows}, {zone_cols}), value raster is ({value_rows}, {value_cols})"
    )]
    ShapeMismatch {
        zone_rows: usize,
        zone_cols: usize,
        value_rows: usize,
        value_cols: usize,
    },

    #[error(
        "Block at ({x_off}, {y_off}) of size {width}x{height} exceeds raster extent ({rows}, {cols})"
    )]
    BlockOutOfBounds {
        x_off: usize,
        y_off: usize,
        width: usize,
        height: usize,
        rows: usize,
        cols: usize,
    },

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for gridstat operations
pub type Result<T> = std::result::Result<T, Error>;
