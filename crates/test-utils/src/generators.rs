//! Generators for synthetic elevation grids and greyscale rasters.
//!
//! These produce predictable patterns so tests can state the expected
//! colors and masks without decoding anything.

use relief_common::{ElevationGrid, GreyRaster};

/// Creates a grid whose value rises linearly from `low` in the top-left
/// corner to `high` in the bottom-right corner.
///
/// # Example
///
/// ```
/// use test_utils::create_slope_grid;
///
/// let grid = create_slope_grid(3, 3, 0.0, 400.0);
/// assert_eq!(grid.get(0, 0), Some(0.0));
/// assert_eq!(grid.get(2, 2), Some(400.0));
/// ```
pub fn create_slope_grid(width: usize, height: usize, low: f64, high: f64) -> ElevationGrid {
    let steps = (width + height).saturating_sub(2).max(1) as f64;
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let t = (row + col) as f64 / steps;
            data.push(low + t * (high - low));
        }
    }
    ElevationGrid::new(width, height, data).expect("slope grid dimensions")
}

/// Creates an island: sea floor at the edges rising to a peak in the middle.
///
/// Values range from `depth` (negative) at the corners to `peak` at the
/// center, crossing zero roughly halfway out.
pub fn create_island_grid(width: usize, height: usize, depth: f64, peak: f64) -> ElevationGrid {
    let cx = (width as f64 - 1.0) / 2.0;
    let cy = (height as f64 - 1.0) / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt().max(1.0);

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f64 - cx;
            let dy = row as f64 - cy;
            let t = (dx * dx + dy * dy).sqrt() / max_dist;
            data.push(peak + t * (depth - peak));
        }
    }
    ElevationGrid::new(width, height, data).expect("island grid dimensions")
}

/// Creates an 8-bit raster whose samples increase left to right,
/// wrapping at 256.
pub fn create_ramp_raster(width: usize, height: usize) -> GreyRaster {
    let samples: Vec<u8> = (0..height)
        .flat_map(|_| (0..width).map(|col| (col % 256) as u8))
        .collect();
    GreyRaster::from_luma8(width, height, &samples).expect("ramp raster dimensions")
}

/// Creates an 8-bit raster that is white on the left half and black on
/// the right half.
pub fn create_half_mask_raster(width: usize, height: usize) -> GreyRaster {
    let samples: Vec<u8> = (0..height)
        .flat_map(|_| (0..width).map(move |col| if col < width / 2 { 255 } else { 0 }))
        .collect();
    GreyRaster::from_luma8(width, height, &samples).expect("mask raster dimensions")
}
