//! Greyscale raster decoding and elevation rescaling.

use std::path::Path;

use image::{ColorType, DynamicImage};
use relief_common::{ElevationGrid, GreyRaster, RasterReader, ReliefError, ReliefResult};

/// How raw raster samples map onto elevations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueScale {
    /// The raster's own darkest sample becomes `min`, its brightest `max`.
    Observed { min: f64, max: f64 },
    /// Zero becomes `black` and the encoding's full-scale value becomes `white`.
    FullScale { black: f64, white: f64 },
}

impl ValueScale {
    /// Elevation assigned to the low reference point.
    pub fn low(&self) -> f64 {
        match *self {
            ValueScale::Observed { min, .. } => min,
            ValueScale::FullScale { black, .. } => black,
        }
    }

    /// Elevation assigned to the high reference point.
    pub fn high(&self) -> f64 {
        match *self {
            ValueScale::Observed { max, .. } => max,
            ValueScale::FullScale { white, .. } => white,
        }
    }
}

/// Reads rasters from disk with the `image` crate.
///
/// 8-bit encodings keep a full scale of 255 and 16-bit or float encodings a
/// full scale of 65535. Colour rasters are reduced to luma first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileReader;

impl RasterReader for ImageFileReader {
    fn read_grey(&self, path: &Path) -> ReliefResult<GreyRaster> {
        let image = image::io::Reader::open(path)
            .map_err(|e| ReliefError::decode(path, e.to_string()))?
            .with_guessed_format()
            .map_err(|e| ReliefError::decode(path, e.to_string()))?
            .decode()
            .map_err(|e| ReliefError::decode(path, e.to_string()))?;

        let raster = grey_from_image(image)?;
        tracing::debug!(
            path = %path.display(),
            dims = %raster.dims(),
            full_scale = raster.full_scale(),
            "Decoded raster"
        );
        Ok(raster)
    }
}

/// Reduce a decoded image to a single channel.
pub fn grey_from_image(image: DynamicImage) -> ReliefResult<GreyRaster> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let color = image.color();
    let wide = matches!(
        color,
        ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 | ColorType::Rgb32F | ColorType::Rgba32F
    );

    match image {
        DynamicImage::ImageLuma8(buf) => GreyRaster::from_luma8(width, height, buf.as_raw()),
        DynamicImage::ImageLuma16(buf) => GreyRaster::new(width, height, buf.into_raw(), u16::MAX),
        other if wide => {
            tracing::debug!(color = ?color, "Converting raster to 16-bit luma");
            GreyRaster::new(width, height, other.to_luma16().into_raw(), u16::MAX)
        }
        other => {
            tracing::debug!(color = ?color, "Converting raster to 8-bit luma");
            GreyRaster::from_luma8(width, height, other.to_luma8().as_raw())
        }
    }
}

/// Linearly rescale raw samples into elevations.
///
/// With `ValueScale::Observed` a constant raster has no spread to stretch,
/// so every pixel takes the low value.
pub fn rescale(raster: &GreyRaster, scale: ValueScale) -> ReliefResult<ElevationGrid> {
    let dims = raster.dims();
    let low = scale.low();
    let high = scale.high();

    let (origin, span) = match scale {
        ValueScale::Observed { .. } => match raster.observed_range() {
            Some((lo, hi)) => (lo as f64, (hi - lo) as f64),
            None => (0.0, 0.0),
        },
        ValueScale::FullScale { .. } => (0.0, raster.full_scale() as f64),
    };

    let data: Vec<f64> = raster
        .samples()
        .iter()
        .map(|&raw| {
            if span == 0.0 {
                low
            } else {
                low + (raw as f64 - origin) / span * (high - low)
            }
        })
        .collect();

    ElevationGrid::new(dims.width, dims.height, data)
}

/// Decode the raster at `path` and rescale it into elevations.
pub fn load<R>(reader: &R, path: &Path, scale: ValueScale) -> ReliefResult<ElevationGrid>
where
    R: RasterReader + ?Sized,
{
    let raster = reader.read_grey(path)?;
    let grid = rescale(&raster, scale)?;
    tracing::debug!(
        path = %path.display(),
        low = scale.low(),
        high = scale.high(),
        range = ?grid.min_max(),
        "Loaded elevation grid"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb as ImageRgb};

    #[test]
    fn test_observed_scale_hits_endpoints() {
        let raster = GreyRaster::from_luma8(3, 1, &[20, 120, 220]).unwrap();
        let grid = rescale(&raster, ValueScale::Observed { min: -100.0, max: 100.0 }).unwrap();
        assert_eq!(grid.values(), &[-100.0, 0.0, 100.0]);
    }

    #[test]
    fn test_full_scale_uses_encoding_maximum() {
        let raster = GreyRaster::from_luma8(3, 1, &[0, 51, 255]).unwrap();
        let grid = rescale(&raster, ValueScale::FullScale { black: 0.0, white: 1000.0 }).unwrap();
        assert_eq!(grid.values(), &[0.0, 200.0, 1000.0]);
    }

    #[test]
    fn test_constant_raster_maps_to_low() {
        let raster = GreyRaster::from_luma8(2, 2, &[77; 4]).unwrap();
        let grid = rescale(&raster, ValueScale::Observed { min: 5.0, max: 50.0 }).unwrap();
        assert!(grid.values().iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_luma16_keeps_wide_full_scale() {
        let buf: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(2, 1, vec![0, 65535]).unwrap();
        let raster = grey_from_image(DynamicImage::ImageLuma16(buf)).unwrap();
        assert_eq!(raster.full_scale(), u16::MAX);
        assert_eq!(raster.samples(), &[0, 65535]);
    }

    #[test]
    fn test_rgb_reduced_to_luma8() {
        let buf: ImageBuffer<ImageRgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(2, 1, vec![0, 0, 0, 255, 255, 255]).unwrap();
        let raster = grey_from_image(DynamicImage::ImageRgb8(buf)).unwrap();
        assert_eq!(raster.full_scale(), 255);
        assert_eq!(raster.samples(), &[0, 255]);
    }
}
