//! Common types shared across the relief-colorizer crates.

pub mod color;
pub mod error;
pub mod grid;
pub mod raster;

pub use color::{ColorValue, Rgb};
pub use error::{ReliefError, ReliefResult};
pub use grid::{Dimensions, ElevationGrid, Mask};
pub use raster::{GreyRaster, RasterReader};
