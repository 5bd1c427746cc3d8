//! Raster data structures and streaming access

mod element;
mod geotransform;
mod grid;
mod source;
mod window;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::Raster;
pub use source::BlockSource;
pub use window::{BlockIterator, BlockWindow};
