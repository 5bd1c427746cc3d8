//! GeoTIFF reading and writing
//!
//! Pure-Rust reader/writer built on the `tiff` crate. Understands the
//! GeoTIFF georeferencing tags (ModelPixelScale, ModelTiepoint) and the
//! GDAL_NODATA convention; projection metadata beyond a GeoKey stub is not
//! interpreted.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::Gray32Float;
use tiff::tags::Tag;

// GeoTIFF / GDAL private tags
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
const TAG_GDAL_NODATA: u16 = 42113;

/// Read a single-band GeoTIFF file into a Raster
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(file)
}

/// Read a single-band GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data))
}

/// Cast a decoded pixel buffer into the requested element type.
///
/// Values outside the target type's range fall back to the type's default
/// nodata rather than failing the whole read.
fn cast_pixels<S, T>(buf: Vec<S>) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.iter()
        .map(|&v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

/// Internal: decode a GeoTIFF from any `Read + Seek` source
fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let data: Vec<T> = match result {
        DecodingResult::U8(buf) => cast_pixels(buf),
        DecodingResult::U16(buf) => cast_pixels(buf),
        DecodingResult::U32(buf) => cast_pixels(buf),
        DecodingResult::I8(buf) => cast_pixels(buf),
        DecodingResult::I16(buf) => cast_pixels(buf),
        DecodingResult::I32(buf) => cast_pixels(buf),
        DecodingResult::F32(buf) => cast_pixels(buf),
        DecodingResult::F64(buf) => cast_pixels(buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ));
        }
    };

    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Ok(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }

    if let Some(nodata) = read_nodata(&mut decoder) {
        raster.set_nodata(Some(nodata));
    }

    Ok(raster)
}

/// Attempt to read a GeoTransform from ModelPixelScale + ModelTiepoint
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_PIXEL_SCALE))
        .map_err(|_| Error::Other("No pixel scale tag".into()))?;

    let tiepoint = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_TIEPOINT))
        .map_err(|_| Error::Other("No tiepoint tag".into()))?;

    if scale.len() >= 2 && tiepoint.len() >= 6 {
        // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];

        return Ok(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
    }

    Err(Error::Other("Cannot determine geotransform".into()))
}

/// Attempt to read the GDAL_NODATA ASCII tag
fn read_nodata<T, R>(decoder: &mut Decoder<R>) -> Option<T>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let text = decoder
        .get_tag_ascii_string(Tag::Unknown(TAG_GDAL_NODATA))
        .ok()?;
    let value: f64 = text.trim().trim_end_matches('\0').parse().ok()?;
    num_traits::cast(value)
}

/// Write a Raster to a GeoTIFF file
///
/// Pixel data is written as 32-bit float with ModelPixelScale, ModelTiepoint
/// and GDAL_NODATA tags.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, file)
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(raster: &Raster<T>) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Internal: encode a Raster as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W) -> Result<()>
where
    T: RasterElement,
    W: std::io::Write + std::io::Seek,
{
    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();

    let scale = vec![gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE), scale.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write scale tag: {}", e)))?;

    let tiepoint = vec![0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_TIEPOINT), tiepoint.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write tiepoint tag: {}", e)))?;

    // Minimal GeoKey directory so downstream tools accept the file:
    // GTModelTypeGeoKey=1 (Projected), GTRasterTypeGeoKey=1 (PixelIsArea).
    let geokeys: Vec<u16> = vec![
        1, 1, 0, 2, //
        1024, 0, 1, 1, //
        1025, 0, 1, 1,
    ];
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_GEO_KEY_DIRECTORY), geokeys.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write geokey tag: {}", e)))?;

    if let Some(nodata) = raster.nodata().and_then(|nd| nd.to_f64()) {
        let text = format!("{}", nodata);
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_GDAL_NODATA), text.as_str())
            .map_err(|e| Error::Other(format!("Cannot write nodata tag: {}", e)))?;
    }

    image
        .write_data(&data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_roundtrip_with_metadata() {
        let mut raster: Raster<f64> = Raster::filled(3, 4, 2.5);
        raster.set_transform(GeoTransform::new(100.0, 200.0, 10.0, -10.0));
        raster.set_nodata(Some(-9999.0));
        raster.set(1, 2, -9999.0).unwrap();

        let buf = write_geotiff_to_buffer(&raster).unwrap();
        let back: Raster<f64> = read_geotiff_from_buffer(&buf).unwrap();

        assert_eq!(back.shape(), (3, 4));
        assert_eq!(back.get(0, 0).unwrap(), 2.5);
        assert_eq!(back.get(1, 2).unwrap(), -9999.0);
        assert_eq!(back.nodata(), Some(-9999.0));
        assert_eq!(back.transform(), raster.transform());
    }

    #[test]
    fn test_read_garbage_fails() {
        let result: Result<Raster<f64>> = read_geotiff_from_buffer(b"not a tiff");
        assert!(result.is_err());
    }
}
