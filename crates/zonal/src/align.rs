//! Alignment of a value raster onto a target grid
//!
//! Zonal aggregation requires the value raster to sit pixel-for-pixel on
//! the zone raster's grid. The aligner resamples the value raster onto the
//! target grid by sampling each target cell center in the source: nearest
//! neighbor by default, bilinear on request. Cells falling outside the
//! source extent, or landing only on nodata, become NaN in the output.
//!
//! No reprojection happens here: when both rasters declare a CRS they must
//! be equivalent, otherwise alignment fails.

use gridstat_core::raster::{Raster, RasterElement};
use gridstat_core::{Error, Result};
use ndarray::Array2;

/// Resampling method used when mapping value pixels onto the target grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleMethod {
    /// Value of the source cell containing the target cell center
    #[default]
    Nearest,
    /// Distance-weighted blend of the four surrounding source cells
    Bilinear,
}

/// Resample `source` onto the grid of `target`.
///
/// The result has the target's shape, transform and CRS, carries NaN as its
/// nodata sentinel, and can be fed to the aggregation alongside `target`
/// directly. Runs even when the grids already match (identity resample).
///
/// # Errors
/// `CrsMismatch` when both rasters declare a CRS and they differ.
pub fn align_to_grid<T: RasterElement>(
    source: &Raster<f64>,
    target: &Raster<T>,
    method: ResampleMethod,
) -> Result<Raster<f64>> {
    if let (Some(src_crs), Some(dst_crs)) = (source.crs(), target.crs())
        && !src_crs.is_equivalent(dst_crs)
    {
        return Err(Error::CrsMismatch(
            src_crs.to_string(),
            dst_crs.to_string(),
        ));
    }

    let (rows, cols) = target.shape();
    let mut data = Array2::from_elem((rows, cols), f64::NAN);

    for row in 0..rows {
        for col in 0..cols {
            let (x, y) = target.pixel_to_geo(col, row);
            let (src_col, src_row) = source.geo_to_pixel(x, y);

            let sample = match method {
                ResampleMethod::Nearest => sample_nearest(source, src_col, src_row),
                ResampleMethod::Bilinear => sample_bilinear(source, src_col, src_row),
            };

            if let Some(value) = sample {
                data[(row, col)] = value;
            }
        }
    }

    let mut aligned = Raster::from_array(data);
    aligned.set_transform(*target.transform());
    aligned.set_crs(target.crs().cloned().or_else(|| source.crs().cloned()));
    aligned.set_nodata(Some(f64::NAN));

    Ok(aligned)
}

/// Value of the source cell containing fractional pixel (col, row)
fn sample_nearest(source: &Raster<f64>, col: f64, row: f64) -> Option<f64> {
    let (rows, cols) = source.shape();

    if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
        return None;
    }

    let c = col.floor() as usize;
    let r = row.floor() as usize;
    if r >= rows || c >= cols {
        return None;
    }

    let value = unsafe { source.get_unchecked(r, c) };
    if source.is_nodata(value) {
        return None;
    }

    Some(value)
}

/// Bilinear blend of the four source cells surrounding fractional pixel
/// (col, row), measured between cell centers. Nodata neighbors drop out and
/// the remaining weights renormalize.
fn sample_bilinear(source: &Raster<f64>, col: f64, row: f64) -> Option<f64> {
    let (rows, cols) = source.shape();

    if !col.is_finite() || !row.is_finite() {
        return None;
    }

    // Shift to cell-center coordinates
    let u = col - 0.5;
    let v = row - 0.5;
    let c0 = u.floor();
    let r0 = v.floor();
    let du = u - c0;
    let dv = v - r0;

    let neighbors = [
        (r0, c0, (1.0 - du) * (1.0 - dv)),
        (r0, c0 + 1.0, du * (1.0 - dv)),
        (r0 + 1.0, c0, (1.0 - du) * dv),
        (r0 + 1.0, c0 + 1.0, du * dv),
    ];

    let mut acc = 0.0;
    let mut weight_sum = 0.0;

    for (nr, nc, weight) in neighbors {
        if weight == 0.0 || nr < 0.0 || nc < 0.0 {
            continue;
        }
        let (r, c) = (nr as usize, nc as usize);
        if r >= rows || c >= cols {
            continue;
        }

        let value = unsafe { source.get_unchecked(r, c) };
        if source.is_nodata(value) {
            continue;
        }

        acc += value * weight;
        weight_sum += weight;
    }

    if weight_sum > 0.0 {
        Some(acc / weight_sum)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gridstat_core::{Crs, GeoTransform};

    #[test]
    fn test_identity_resample() {
        let mut source = Raster::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        source.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));
        let mut target: Raster<i32> = Raster::new(2, 2);
        target.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));

        let aligned = align_to_grid(&source, &target, ResampleMethod::Nearest).unwrap();
        assert_eq!(aligned.data(), source.data());
        assert_eq!(aligned.transform(), target.transform());
        assert_eq!(aligned.nodata(), Some(f64::NAN));
    }

    #[test]
    fn test_nearest_upsample_doubles_cells() {
        let mut source = Raster::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        source.set_transform(GeoTransform::new(0.0, 4.0, 2.0, -2.0));
        let mut target: Raster<i32> = Raster::new(4, 4);
        target.set_transform(GeoTransform::new(0.0, 4.0, 1.0, -1.0));

        let aligned = align_to_grid(&source, &target, ResampleMethod::Nearest).unwrap();

        // Each source cell expands to a 2x2 quadrant
        for (row, col, expected) in [
            (0, 0, 1.0),
            (0, 3, 2.0),
            (1, 1, 1.0),
            (3, 0, 3.0),
            (2, 2, 4.0),
            (3, 3, 4.0),
        ] {
            assert_eq!(aligned.get(row, col).unwrap(), expected);
        }
    }

    #[test]
    fn test_outside_extent_becomes_nan() {
        let mut source = Raster::filled(2, 2, 7.0);
        source.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));
        // Target extends east of the source
        let mut target: Raster<i32> = Raster::new(2, 4);
        target.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));

        let aligned = align_to_grid(&source, &target, ResampleMethod::Nearest).unwrap();
        assert_eq!(aligned.get(0, 1).unwrap(), 7.0);
        assert!(aligned.get(0, 2).unwrap().is_nan());
        assert!(aligned.get(1, 3).unwrap().is_nan());
    }

    #[test]
    fn test_nearest_skips_source_nodata() {
        let mut source = Raster::from_vec(vec![5.0, -1.0, 5.0, 5.0], 2, 2).unwrap();
        source.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));
        source.set_nodata(Some(-1.0));
        let mut target: Raster<i32> = Raster::new(2, 2);
        target.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));

        let aligned = align_to_grid(&source, &target, ResampleMethod::Nearest).unwrap();
        assert!(aligned.get(0, 1).unwrap().is_nan());
        assert_eq!(aligned.get(1, 1).unwrap(), 5.0);
    }

    #[test]
    fn test_bilinear_midpoint_averages_neighbors() {
        let mut source = Raster::from_vec(vec![0.0, 10.0, 20.0, 30.0], 2, 2).unwrap();
        source.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));
        // Single target cell centered between all four source centers
        let mut target: Raster<i32> = Raster::new(1, 1);
        target.set_transform(GeoTransform::new(0.0, 2.0, 2.0, -2.0));

        let aligned = align_to_grid(&source, &target, ResampleMethod::Bilinear).unwrap();
        assert_relative_eq!(aligned.get(0, 0).unwrap(), 15.0);
    }

    #[test]
    fn test_bilinear_at_source_centers_is_exact() {
        let mut source = Raster::from_vec(vec![0.0, 10.0, 20.0, 30.0], 2, 2).unwrap();
        source.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));
        let mut target: Raster<i32> = Raster::new(2, 2);
        target.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));

        let aligned = align_to_grid(&source, &target, ResampleMethod::Bilinear).unwrap();
        assert_eq!(aligned.data(), source.data());
    }

    #[test]
    fn test_crs_mismatch_rejected() {
        let mut source: Raster<f64> = Raster::new(2, 2);
        source.set_crs(Some(Crs::from_epsg(32630)));
        let mut target: Raster<i32> = Raster::new(2, 2);
        target.set_crs(Some(Crs::from_epsg(4326)));

        let result = align_to_grid(&source, &target, ResampleMethod::Nearest);
        assert!(matches!(result, Err(Error::CrsMismatch(_, _))));
    }

    #[test]
    fn test_missing_crs_accepted() {
        let mut source: Raster<f64> = Raster::filled(2, 2, 1.0);
        source.set_crs(Some(Crs::from_epsg(4326)));
        let target: Raster<i32> = Raster::new(2, 2);

        assert!(align_to_grid(&source, &target, ResampleMethod::Nearest).is_ok());
    }
}
