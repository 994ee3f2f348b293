//! Elevation-to-color ramps.
//!
//! A ramp is an ascending list of thresholds plus the colors attached to them.
//! Two modes are supported:
//! - **Step**: one more color than thresholds. A value takes the color after
//!   the highest threshold it strictly exceeds, or the first color if it
//!   exceeds none.
//! - **Gradient**: one color per threshold. Values between two thresholds are
//!   interpolated channel-wise; values outside the range clamp to the first
//!   or last color. An optional exponent warps both the values and the
//!   thresholds through `sign(x) * |x|^e` before interpolating.

use relief_common::{ElevationGrid, ReliefError, ReliefResult, Rgb};

/// How a ramp turns an elevation into a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampMode {
    Step,
    Gradient { warp: Option<f64> },
}

/// A validated threshold/color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    thresholds: Vec<f64>,
    colors: Vec<Rgb>,
    mode: RampMode,
    /// Thresholds after warping; equal to `thresholds` unless a warp is set.
    anchors: Vec<f64>,
}

impl ColorRamp {
    /// Build a ramp, checking threshold order and color counts for `mode`.
    pub fn new(thresholds: Vec<f64>, colors: Vec<Rgb>, mode: RampMode) -> ReliefResult<Self> {
        if let Some(bad) = thresholds.iter().find(|t| !t.is_finite()) {
            return Err(ReliefError::ramp_config(format!(
                "threshold {} is not a finite number",
                bad
            )));
        }
        if let Some(pair) = thresholds.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(ReliefError::ramp_config(format!(
                "thresholds must be strictly ascending, found {} followed by {}",
                pair[0], pair[1]
            )));
        }

        let anchors = match mode {
            RampMode::Step => {
                if colors.len() != thresholds.len() + 1 {
                    return Err(ReliefError::ramp_config(format!(
                        "step ramp needs one more color than thresholds, got {} thresholds and {} colors",
                        thresholds.len(),
                        colors.len()
                    )));
                }
                thresholds.clone()
            }
            RampMode::Gradient { warp } => {
                if thresholds.is_empty() {
                    return Err(ReliefError::ramp_config("gradient ramp needs at least one threshold"));
                }
                if colors.len() != thresholds.len() {
                    return Err(ReliefError::ramp_config(format!(
                        "gradient ramp needs one color per threshold, got {} thresholds and {} colors",
                        thresholds.len(),
                        colors.len()
                    )));
                }
                match warp {
                    Some(e) if !(e.is_finite() && e > 0.0) => {
                        return Err(ReliefError::ramp_config(format!(
                            "gradient exponent must be a positive number, got {}",
                            e
                        )));
                    }
                    Some(e) => {
                        let anchors: Vec<f64> = thresholds.iter().map(|&t| warp_value(t, e)).collect();
                        if let Some(bad) = anchors.iter().find(|a| !a.is_finite()) {
                            return Err(ReliefError::ramp_config(format!(
                                "exponent {} overflows threshold range to {}",
                                e, bad
                            )));
                        }
                        if let Some(pair) = anchors.windows(2).find(|pair| pair[0] >= pair[1]) {
                            return Err(ReliefError::ramp_config(format!(
                                "thresholds are no longer distinct after warping with exponent {}: {} and {}",
                                e, pair[0], pair[1]
                            )));
                        }
                        anchors
                    }
                    None => thresholds.clone(),
                }
            }
        };

        Ok(Self {
            thresholds,
            colors,
            mode,
            anchors,
        })
    }

    /// Step ramp shorthand.
    pub fn step(thresholds: Vec<f64>, colors: Vec<Rgb>) -> ReliefResult<Self> {
        Self::new(thresholds, colors, RampMode::Step)
    }

    /// Gradient ramp shorthand.
    pub fn gradient(thresholds: Vec<f64>, colors: Vec<Rgb>, warp: Option<f64>) -> ReliefResult<Self> {
        Self::new(thresholds, colors, RampMode::Gradient { warp })
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn mode(&self) -> RampMode {
        self.mode
    }

    /// Color for a single elevation. NaN takes the first color.
    pub fn color_at(&self, value: f64) -> Rgb {
        match self.mode {
            RampMode::Step => {
                // Number of thresholds strictly below the value.
                let above = self.thresholds.partition_point(|&t| t < value);
                self.colors[above]
            }
            RampMode::Gradient { warp } => {
                let value = match warp {
                    Some(e) => warp_value(value, e),
                    None => value,
                };
                let above = self.anchors.partition_point(|&t| t < value);
                if above == 0 {
                    self.colors[0]
                } else if above == self.anchors.len() {
                    self.colors[above - 1]
                } else {
                    let lo = self.anchors[above - 1];
                    let hi = self.anchors[above];
                    let frac = (value - lo) / (hi - lo);
                    self.colors[above - 1].lerp(self.colors[above], frac)
                }
            }
        }
    }

    /// Color every pixel of `grid`, row-major.
    pub fn colorize(&self, grid: &ElevationGrid) -> Vec<Rgb> {
        grid.values().iter().map(|&v| self.color_at(v)).collect()
    }
}

/// Sign-preserving power: `sign(x) * |x|^exponent`.
pub fn warp_value(x: f64, exponent: f64) -> f64 {
    if x == 0.0 || x.is_nan() {
        return x;
    }
    x.signum() * x.abs().powf(exponent)
}
