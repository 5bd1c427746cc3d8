//! Block read contract for raster collaborators
//!
//! The aggregation core never touches file formats or full grids directly;
//! it consumes any backing store through this trait, one block at a time.

use crate::error::{Error, Result};
use crate::raster::{BlockIterator, BlockWindow, Raster, RasterElement};
use ndarray::{Array2, s};

/// A grid that can be read block-by-block.
///
/// Implementations report their extent and nodata sentinel and materialize
/// rectangular sub-arrays on demand. Reads are synchronous; a failed read is
/// fatal to the caller (no retry semantics).
pub trait BlockSource {
    /// Cell value type
    type Value: RasterElement;

    /// Dimensions as (rows, cols)
    fn shape(&self) -> (usize, usize);

    /// Nodata sentinel, if the grid declares one
    fn nodata(&self) -> Option<Self::Value>;

    /// Read the sub-array covered by `window` as a 2D array.
    ///
    /// The window must lie entirely within the grid extent.
    fn read_block(&self, window: &BlockWindow) -> Result<Array2<Self::Value>>;

    /// Windows tiling this grid's full extent in row-major order
    fn blocks(&self, block_rows: usize, block_cols: usize) -> BlockIterator {
        let (rows, cols) = self.shape();
        BlockIterator::new(rows, cols, block_rows, block_cols)
    }
}

impl<T: RasterElement> BlockSource for Raster<T> {
    type Value = T;

    fn shape(&self) -> (usize, usize) {
        Raster::shape(self)
    }

    fn nodata(&self) -> Option<T> {
        Raster::nodata(self)
    }

    fn read_block(&self, window: &BlockWindow) -> Result<Array2<T>> {
        let (rows, cols) = Raster::shape(self);
        if window.y_off + window.height > rows || window.x_off + window.width > cols {
            return Err(Error::BlockOutOfBounds {
                x_off: window.x_off,
                y_off: window.y_off,
                width: window.width,
                height: window.height,
                rows,
                cols,
            });
        }

        Ok(self
            .data()
            .slice(s![window.row_range(), window.col_range()])
            .to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_raster(rows: usize, cols: usize) -> Raster<i32> {
        let data: Vec<i32> = (0..rows * cols).map(|i| i as i32).collect();
        Raster::from_vec(data, rows, cols).unwrap()
    }

    #[test]
    fn test_read_block_contents() {
        let raster = counting_raster(4, 4);
        let block = raster.read_block(&BlockWindow::new(1, 2, 2, 2)).unwrap();

        assert_eq!(block.dim(), (2, 2));
        assert_eq!(block[(0, 0)], 9); // row 2, col 1
        assert_eq!(block[(1, 1)], 14); // row 3, col 2
    }

    #[test]
    fn test_read_block_out_of_bounds() {
        let raster = counting_raster(4, 4);
        let result = raster.read_block(&BlockWindow::new(2, 2, 3, 3));
        assert!(matches!(result, Err(Error::BlockOutOfBounds { .. })));
    }

    #[test]
    fn test_blocks_cover_raster() {
        let raster = counting_raster(10, 10);
        let total: usize = raster.blocks(3, 3).map(|w| w.len()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_full_extent_block() {
        let raster = counting_raster(3, 5);
        let block = raster.read_block(&BlockWindow::new(0, 0, 5, 3)).unwrap();
        assert_eq!(block, *raster.data());
    }
}
