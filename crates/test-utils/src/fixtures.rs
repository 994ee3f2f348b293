//! Common fixtures: named colors, an in-memory raster reader and PNG
//! writers for filesystem-backed tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageBuffer, Luma};
use relief_common::{GreyRaster, RasterReader, ReliefError, ReliefResult, Rgb};

/// Colors used throughout the test suite.
pub mod colors {
    use relief_common::Rgb;

    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GREY: Rgb = Rgb::new(128, 128, 128);
}

/// Rasters held in memory, keyed by path.
///
/// Reading a path that was never inserted fails with a decode error, the
/// same way a missing file does.
#[derive(Debug, Clone, Default)]
pub struct MemoryRasters {
    rasters: HashMap<PathBuf, GreyRaster>,
}

impl MemoryRasters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raster under `path`.
    pub fn with(mut self, path: impl Into<PathBuf>, raster: GreyRaster) -> Self {
        self.rasters.insert(path.into(), raster);
        self
    }

    /// Add an 8-bit raster given as rows of samples.
    pub fn with_rows(self, path: impl Into<PathBuf>, rows: &[&[u8]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let samples: Vec<u8> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        let raster = GreyRaster::from_luma8(width, height, &samples).expect("raster rows");
        self.with(path, raster)
    }
}

impl RasterReader for MemoryRasters {
    fn read_grey(&self, path: &Path) -> ReliefResult<GreyRaster> {
        self.rasters
            .get(path)
            .cloned()
            .ok_or_else(|| ReliefError::decode(path, "no such raster"))
    }
}

/// Write an 8-bit greyscale PNG into `dir` and return its path.
pub fn write_grey_png(dir: &Path, name: &str, width: u32, height: u32, samples: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let image = GrayImage::from_raw(width, height, samples.to_vec()).expect("grey sample count");
    image.save(&path).expect("write grey png");
    path
}

/// Write a 16-bit greyscale PNG into `dir` and return its path.
pub fn write_grey16_png(dir: &Path, name: &str, width: u32, height: u32, samples: &[u16]) -> PathBuf {
    let path = dir.join(name);
    let image: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(width, height, samples.to_vec()).expect("grey16 sample count");
    image.save(&path).expect("write grey16 png");
    path
}

/// Decode an RGB PNG back into colors, row-major.
pub fn read_rgb_png(path: &Path) -> (u32, u32, Vec<Rgb>) {
    let image = image::open(path).expect("decode png").to_rgb8();
    let (width, height) = image.dimensions();
    let pixels = image
        .pixels()
        .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
        .collect();
    (width, height, pixels)
}

/// A fresh temporary directory for a test.
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}
