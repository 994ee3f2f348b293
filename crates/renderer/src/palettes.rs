//! Built-in elevation palettes for sea floor, land and ice.
//!
//! Thresholds are in metres. Each palette carries one more color than
//! thresholds, which is what a step ramp needs. Gradient ramps keep every
//! color and gain a threshold at sea level (above the sea steps, below the
//! land and ice steps) so that every color has an anchor.

use relief_common::{ReliefError, ReliefResult, Rgb};
use serde::{Deserialize, Serialize};

use crate::ramp::{ColorRamp, RampMode};

/// A named built-in palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Sea,
    Land,
    Ice,
}

const SEA_STEPS: [f64; 9] = [
    -8100.0, -6400.0, -4900.0, -3600.0, -2500.0, -1600.0, -900.0, -400.0, -100.0,
];

const SEA_COLORS: [[u8; 3]; 10] = [
    [113, 171, 216],
    [121, 178, 222],
    [132, 185, 227],
    [141, 193, 234],
    [150, 201, 240],
    [161, 210, 247],
    [172, 219, 251],
    [185, 227, 255],
    [198, 236, 255],
    [216, 242, 254],
];

const LAND_STEPS: [f64; 18] = [
    25.0, 100.0, 225.0, 400.0, 625.0, 900.0, 1225.0, 1600.0, 2025.0, 2500.0, 3025.0, 3600.0,
    4225.0, 4900.0, 5625.0, 6400.0, 7225.0, 8100.0,
];

const LAND_COLORS: [[u8; 3]; 19] = [
    [172, 208, 165],
    [148, 191, 139],
    [168, 198, 143],
    [189, 204, 150],
    [209, 215, 171],
    [225, 228, 181],
    [239, 235, 192],
    [232, 225, 182],
    [222, 214, 163],
    [211, 202, 157],
    [202, 185, 130],
    [195, 167, 107],
    [185, 152, 90],
    [170, 135, 83],
    [172, 154, 124],
    [186, 174, 154],
    [202, 195, 184],
    [224, 222, 216],
    [245, 244, 242],
];

const ICE_STEPS: [f64; 9] = [100.0, 400.0, 900.0, 1600.0, 2500.0, 3600.0, 4900.0, 6400.0, 8100.0];

const ICE_COLORS: [[u8; 3]; 10] = [
    [210, 210, 210],
    [215, 215, 215],
    [220, 220, 220],
    [225, 225, 225],
    [230, 230, 230],
    [235, 235, 235],
    [240, 240, 240],
    [245, 245, 245],
    [250, 250, 250],
    [255, 255, 255],
];

impl Palette {
    pub fn name(&self) -> &'static str {
        match self {
            Palette::Sea => "sea",
            Palette::Land => "land",
            Palette::Ice => "ice",
        }
    }

    pub fn steps(&self) -> &'static [f64] {
        match self {
            Palette::Sea => &SEA_STEPS,
            Palette::Land => &LAND_STEPS,
            Palette::Ice => &ICE_STEPS,
        }
    }

    pub fn colors(&self) -> Vec<Rgb> {
        let colors: &[[u8; 3]] = match self {
            Palette::Sea => &SEA_COLORS,
            Palette::Land => &LAND_COLORS,
            Palette::Ice => &ICE_COLORS,
        };
        colors.iter().copied().map(Rgb::from).collect()
    }

    /// Thresholds for gradient mode: the step thresholds plus sea level.
    pub fn gradient_steps(&self) -> Vec<f64> {
        let mut steps = self.steps().to_vec();
        match self {
            Palette::Sea => steps.push(0.0),
            Palette::Land | Palette::Ice => steps.insert(0, 0.0),
        }
        steps
    }

    /// Build a ramp from this palette in the given mode.
    pub fn ramp(&self, mode: RampMode) -> ReliefResult<ColorRamp> {
        let steps = match mode {
            RampMode::Step => self.steps().to_vec(),
            RampMode::Gradient { .. } => self.gradient_steps(),
        };
        ColorRamp::new(steps, self.colors(), mode)
    }
}

impl std::str::FromStr for Palette {
    type Err = ReliefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sea" => Ok(Palette::Sea),
            "land" => Ok(Palette::Land),
            "ice" => Ok(Palette::Ice),
            other => Err(ReliefError::config(format!("unknown palette '{}'", other))),
        }
    }
}
