//! Elevation raster coloring and layer compositing.
//!
//! Pipeline stages:
//! - Elevation loading and rescaling (`elevation`)
//! - Step and gradient color ramps (`ramp`, `palettes`)
//! - Per-layer masks (`mask`)
//! - Ordered, overwriting composition (`composite`)
//! - PNG output (`png`)

pub mod composite;
pub mod elevation;
pub mod layer;
pub mod mask;
pub mod palettes;
pub mod png;
pub mod ramp;

pub use composite::{Canvas, Compositor, Coverage, RgbRaster};
pub use elevation::{ImageFileReader, ValueScale};
pub use layer::{ElevationSource, Layer, LayerDocument, LayerRecord, Paint, SourceRole};
pub use mask::{build_mask, Compare, MaskSpec};
pub use palettes::Palette;
pub use ramp::{ColorRamp, RampMode};
