//! Decoded single-channel rasters and the reader seam used to obtain them.

use std::path::Path;

use crate::error::{ReliefError, ReliefResult};
use crate::grid::Dimensions;

/// A decoded greyscale raster.
///
/// Samples are stored widened to `u16` regardless of the source encoding;
/// `full_scale` records the theoretical maximum of that encoding (255 for
/// 8-bit sources, 65535 for 16-bit sources).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreyRaster {
    dims: Dimensions,
    samples: Vec<u16>,
    full_scale: u16,
}

impl GreyRaster {
    pub fn new(
        width: usize,
        height: usize,
        samples: Vec<u16>,
        full_scale: u16,
    ) -> ReliefResult<Self> {
        if samples.len() != width * height {
            return Err(ReliefError::GridShape {
                width,
                height,
                len: samples.len(),
            });
        }
        Ok(Self {
            dims: Dimensions::new(width, height),
            samples,
            full_scale,
        })
    }

    /// An 8-bit raster.
    pub fn from_luma8(width: usize, height: usize, samples: &[u8]) -> ReliefResult<Self> {
        Self::new(
            width,
            height,
            samples.iter().map(|&s| s as u16).collect(),
            u8::MAX as u16,
        )
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn full_scale(&self) -> u16 {
        self.full_scale
    }

    /// Observed minimum and maximum sample, `None` for an empty raster.
    pub fn observed_range(&self) -> Option<(u16, u16)> {
        let min = self.samples.iter().copied().min()?;
        let max = self.samples.iter().copied().max()?;
        Some((min, max))
    }
}

/// Source of decoded greyscale rasters.
pub trait RasterReader {
    /// Decode the raster at `path` into a single channel.
    fn read_grey(&self, path: &Path) -> ReliefResult<GreyRaster>;
}

impl<R: RasterReader + ?Sized> RasterReader for &R {
    fn read_grey(&self, path: &Path) -> ReliefResult<GreyRaster> {
        (**self).read_grey(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma8_full_scale() {
        let raster = GreyRaster::from_luma8(2, 1, &[10, 200]).unwrap();
        assert_eq!(raster.full_scale(), 255);
        assert_eq!(raster.observed_range(), Some((10, 200)));
    }

    #[test]
    fn test_sample_count_checked() {
        assert!(GreyRaster::new(2, 2, vec![0; 3], 255).is_err());
    }
}
