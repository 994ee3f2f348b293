//! Per-layer inclusion masks.
//!
//! Every predicate a layer names is evaluated into its own boolean grid and
//! the layer's mask is their intersection. A layer without predicates paints
//! everywhere.

use std::path::PathBuf;

use relief_common::{ElevationGrid, GreyRaster, Mask, ReliefError, ReliefResult};
use serde::{Deserialize, Serialize};

use crate::elevation::{rescale, ValueScale};

/// Brightness, in percent of full scale, an external mask must exceed.
pub const EXTERNAL_MASK_CUTOFF: f64 = 50.0;

/// Comparison against the base elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compare {
    /// Keep pixels where the layer's elevation is above the base.
    Max,
    /// Keep pixels where the layer's elevation is below the base.
    Min,
}

/// Predicates restricting where a layer paints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskSpec {
    /// Greyscale raster; pixels brighter than half scale are kept.
    pub external: Option<PathBuf>,
    /// Keep pixels with elevation strictly above this value.
    pub above: Option<f64>,
    /// Keep pixels with elevation strictly below this value.
    pub below: Option<f64>,
    pub compare: Option<Compare>,
}

impl MaskSpec {
    /// True when no predicate is set.
    pub fn is_unrestricted(&self) -> bool {
        self.external.is_none()
            && self.above.is_none()
            && self.below.is_none()
            && self.compare.is_none()
    }
}

/// Evaluate `spec` against a layer's elevations.
///
/// `base` is only consulted for a compare predicate and `aux` only for an
/// external predicate; both must match the elevation grid's dimensions.
pub fn build_mask(
    elevation: &ElevationGrid,
    base: Option<&ElevationGrid>,
    spec: &MaskSpec,
    aux: Option<&GreyRaster>,
) -> ReliefResult<Mask> {
    let dims = elevation.dims();
    let mut predicates: Vec<Mask> = Vec::new();

    if spec.external.is_some() {
        let aux = aux.ok_or(ReliefError::MissingMaskRaster)?;
        dims.ensure_matches("mask raster", aux.dims())?;
        let brightness = rescale(aux, ValueScale::FullScale { black: 0.0, white: 100.0 })?;
        predicates.push(Mask::from_values(&brightness, |v| v > EXTERNAL_MASK_CUTOFF));
    }

    if let Some(threshold) = spec.above {
        predicates.push(Mask::from_values(elevation, |v| v > threshold));
    }

    if let Some(threshold) = spec.below {
        predicates.push(Mask::from_values(elevation, |v| v < threshold));
    }

    if let Some(compare) = spec.compare {
        let base = base.ok_or(ReliefError::MissingBaseElevation)?;
        dims.ensure_matches("base elevation", base.dims())?;
        let bits = elevation
            .values()
            .iter()
            .zip(base.values())
            .map(|(&v, &b)| match compare {
                Compare::Max => v > b,
                Compare::Min => v < b,
            })
            .collect();
        predicates.push(Mask::new(dims, bits)?);
    }

    predicates
        .iter()
        .try_fold(Mask::filled(dims, true), |mask, predicate| mask.intersect(predicate))
}
