//! Layer compositing.
//!
//! Layers are applied strictly in order. Each one resolves an elevation grid
//! (its own raster, or the shared base), colors it, builds its mask and then
//! overwrites the canvas wherever the mask holds. Later layers win; there is
//! no blending.

use std::rc::Rc;

use relief_common::{
    Dimensions, ElevationGrid, Mask, RasterReader, ReliefError, ReliefResult, Rgb,
};

use crate::elevation;
use crate::layer::{Layer, Paint, SourceRole};
use crate::mask::build_mask;

/// Painted versus total pixel counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub painted: usize,
    pub total: usize,
}

impl Coverage {
    pub fn uncovered(&self) -> usize {
        self.total - self.painted
    }

    pub fn is_complete(&self) -> bool {
        self.painted == self.total
    }
}

/// The accumulating output. `None` marks a pixel no layer has painted.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    dims: Dimensions,
    pixels: Vec<Option<Rgb>>,
}

impl Canvas {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            pixels: vec![None; dims.len()],
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        self.pixels[y * self.dims.width + x]
    }

    /// Overwrite every pixel where `mask` holds with the matching color.
    ///
    /// Returns the number of pixels painted.
    pub fn paint(&mut self, colors: &[Rgb], mask: &Mask) -> ReliefResult<usize> {
        self.dims.ensure_matches("layer", mask.dims())?;
        if colors.len() != self.pixels.len() {
            return Err(ReliefError::GridShape {
                width: self.dims.width,
                height: self.dims.height,
                len: colors.len(),
            });
        }

        let mut painted = 0;
        for ((pixel, &color), &keep) in self.pixels.iter_mut().zip(colors).zip(mask.bits()) {
            if keep {
                *pixel = Some(color);
                painted += 1;
            }
        }
        Ok(painted)
    }

    pub fn coverage(&self) -> Coverage {
        Coverage {
            painted: self.pixels.iter().filter(|p| p.is_some()).count(),
            total: self.pixels.len(),
        }
    }

    /// Resolve unpainted pixels to `background`.
    pub fn finish(self, background: Rgb) -> RgbRaster {
        let coverage = self.coverage();
        if !coverage.is_complete() {
            tracing::warn!(
                uncovered = coverage.uncovered(),
                total = coverage.total,
                background = %background,
                "Filling pixels not painted by any layer"
            );
        }
        RgbRaster {
            dims: self.dims,
            pixels: self
                .pixels
                .into_iter()
                .map(|p| p.unwrap_or(background))
                .collect(),
        }
    }

    /// Resolve the canvas, failing if any pixel was left unpainted.
    pub fn finish_strict(self) -> ReliefResult<RgbRaster> {
        let coverage = self.coverage();
        if !coverage.is_complete() {
            return Err(ReliefError::IncompleteCoverage {
                uncovered: coverage.uncovered(),
                total: coverage.total,
            });
        }
        Ok(self.finish(Rgb::BLACK))
    }
}

/// A fully-defined RGB raster, ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbRaster {
    dims: Dimensions,
    pixels: Vec<Rgb>,
}

impl RgbRaster {
    pub fn new(dims: Dimensions, pixels: Vec<Rgb>) -> ReliefResult<Self> {
        if pixels.len() != dims.len() {
            return Err(ReliefError::GridShape {
                width: dims.width,
                height: dims.height,
                len: pixels.len(),
            });
        }
        Ok(Self { dims, pixels })
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        self.pixels.get(y * self.dims.width + x).copied()
    }

    /// Interleaved RGB bytes, row-major.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }
}

/// State carried from one layer to the next within a single run.
#[derive(Default)]
struct RunContext {
    base: Option<Rc<ElevationGrid>>,
    canvas: Option<Canvas>,
}

/// Applies layers in order against rasters obtained from `R`.
pub struct Compositor<R> {
    reader: R,
}

impl<R: RasterReader> Compositor<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Run every layer and return the resulting canvas.
    ///
    /// The canvas takes the dimensions of the first layer's elevation grid.
    pub fn composite(&self, layers: &[Layer]) -> ReliefResult<Canvas> {
        if layers.is_empty() {
            return Err(ReliefError::NoLayers);
        }

        tracing::info!(layers = layers.len(), "Compositing layers");
        let mut ctx = RunContext::default();

        for (index, layer) in layers.iter().enumerate() {
            let painted = self
                .apply_layer(&mut ctx, layer)
                .map_err(|e| e.in_layer(index, layer.name.as_str()))?;
            tracing::info!(layer = index, name = %layer.name, painted, "Applied layer");
        }

        let canvas = ctx.canvas.ok_or(ReliefError::NoLayers)?;
        let coverage = canvas.coverage();
        tracing::info!(
            dims = %canvas.dims(),
            painted = coverage.painted,
            total = coverage.total,
            "Composite complete"
        );
        Ok(canvas)
    }

    fn apply_layer(&self, ctx: &mut RunContext, layer: &Layer) -> ReliefResult<usize> {
        let elevation = self.resolve_elevation(ctx, layer)?;

        let colors = match &layer.paint {
            Paint::Solid(color) => vec![*color; elevation.dims().len()],
            Paint::Ramp(ramp) => {
                tracing::debug!(mode = ?ramp.mode(), thresholds = ramp.thresholds().len(), "Coloring layer");
                ramp.colorize(&elevation)
            }
        };

        let aux = match &layer.mask.external {
            Some(path) => Some(self.reader.read_grey(path)?),
            None => None,
        };
        let base = match layer.mask.compare {
            Some(_) => ctx.base.as_deref(),
            None => None,
        };
        let mask = build_mask(&elevation, base, &layer.mask, aux.as_ref())?;
        tracing::debug!(
            restricted = !layer.mask.is_unrestricted(),
            kept = mask.count(),
            "Built layer mask"
        );

        let canvas = ctx
            .canvas
            .get_or_insert_with(|| Canvas::new(elevation.dims()));
        canvas.paint(&colors, &mask)
    }

    fn resolve_elevation(
        &self,
        ctx: &mut RunContext,
        layer: &Layer,
    ) -> ReliefResult<Rc<ElevationGrid>> {
        match &layer.source {
            Some(source) => {
                let grid = Rc::new(elevation::load(&self.reader, &source.path, source.scale)?);
                if source.role == SourceRole::Base {
                    ctx.base = Some(Rc::clone(&grid));
                }
                Ok(grid)
            }
            None => ctx.base.clone().ok_or(ReliefError::NoElevationSource),
        }
    }
}
