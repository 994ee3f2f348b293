//! Row-major pixel grids: elevation values and boolean masks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReliefError, ReliefResult};

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fail with `DimensionMismatch` unless `other` equals `self`.
    pub fn ensure_matches(&self, what: &str, other: Dimensions) -> ReliefResult<()> {
        if *self == other {
            Ok(())
        } else {
            Err(ReliefError::dimension_mismatch(what, *self, other))
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A 2D grid of real-valued elevations, one value per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    dims: Dimensions,
    data: Vec<f64>,
}

impl ElevationGrid {
    /// Create a grid from row-major data.
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> ReliefResult<Self> {
        if data.len() != width * height {
            return Err(ReliefError::GridShape {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            dims: Dimensions::new(width, height),
            data,
        })
    }

    /// Create a grid from a list of equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> ReliefResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(width, height, data)
    }

    /// A grid where every pixel has the same value.
    pub fn filled(dims: Dimensions, value: f64) -> Self {
        Self {
            dims,
            data: vec![value; dims.len()],
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    /// Row-major values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        self.data.get(y * self.dims.width + x).copied()
    }

    /// Smallest and largest finite value, if any.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Per-pixel inclusion set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    dims: Dimensions,
    bits: Vec<bool>,
}

impl Mask {
    /// A mask with every pixel set to `value`.
    pub fn filled(dims: Dimensions, value: bool) -> Self {
        Self {
            dims,
            bits: vec![value; dims.len()],
        }
    }

    /// Build a mask by testing every elevation value.
    pub fn from_values<F>(grid: &ElevationGrid, predicate: F) -> Self
    where
        F: Fn(f64) -> bool,
    {
        Self {
            dims: grid.dims(),
            bits: grid.values().iter().map(|&v| predicate(v)).collect(),
        }
    }

    /// Build a mask from row-major booleans.
    pub fn new(dims: Dimensions, bits: Vec<bool>) -> ReliefResult<Self> {
        if bits.len() != dims.len() {
            return Err(ReliefError::GridShape {
                width: dims.width,
                height: dims.height,
                len: bits.len(),
            });
        }
        Ok(Self { dims, bits })
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        self.bits.get(y * self.dims.width + x).copied()
    }

    /// Intersect with another mask of the same dimensions.
    pub fn intersect(mut self, other: &Mask) -> ReliefResult<Self> {
        self.dims.ensure_matches("mask", other.dims)?;
        for (bit, &keep) in self.bits.iter_mut().zip(&other.bits) {
            *bit &= keep;
        }
        Ok(self)
    }

    /// Number of included pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_is_row_major() {
        let grid = ElevationGrid::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(grid.dims(), Dimensions::new(3, 2));
        assert_eq!(grid.get(2, 0), Some(3.0));
        assert_eq!(grid.get(0, 1), Some(4.0));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = ElevationGrid::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, ReliefError::GridShape { len: 3, .. }));
    }

    #[test]
    fn test_min_max_skips_nan() {
        let grid = ElevationGrid::new(3, 1, vec![f64::NAN, -4.0, 9.0]).unwrap();
        assert_eq!(grid.min_max(), Some((-4.0, 9.0)));
        assert_eq!(ElevationGrid::filled(Dimensions::new(2, 1), f64::NAN).min_max(), None);
    }

    #[test]
    fn test_mask_intersection() {
        let dims = Dimensions::new(2, 2);
        let a = Mask::new(dims, vec![true, true, false, false]).unwrap();
        let b = Mask::new(dims, vec![true, false, true, false]).unwrap();
        let both = a.intersect(&b).unwrap();
        assert_eq!(both.bits(), &[true, false, false, false]);
        assert_eq!(both.count(), 1);

        let other = Mask::filled(Dimensions::new(1, 4), true);
        assert!(both.intersect(&other).is_err());
    }
}
