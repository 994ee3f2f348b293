//! 8-bit RGB colors and their configuration forms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A raw 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "ColorValue", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear interpolation towards `other`.
    ///
    /// `t` is clamped to `[0, 1]` and each channel is truncated towards zero,
    /// so `lerp(a, b, 0.0) == a` and `lerp(a, b, 1.0) == b` exactly.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| -> u8 {
            let a = a as f64;
            let b = b as f64;
            (a + (b - a) * t) as u8
        };
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(color: Rgb) -> Self {
        color.to_array()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Parse `#rrggbb`, `rrggbb` or a basic color name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(color) = named_color(s) {
            return Ok(color);
        }
        parse_hex_color(s).ok_or_else(|| format!("invalid color '{}'", s))
    }
}

/// Color representation accepted in configuration files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// RGB array: [r, g, b]
    Array([u8; 3]),

    /// Hex string "#RRGGBB" or a color name
    Text(String),
}

impl TryFrom<ColorValue> for Rgb {
    type Error = String;

    fn try_from(value: ColorValue) -> Result<Self, Self::Error> {
        match value {
            ColorValue::Array(arr) => Ok(Rgb::from(arr)),
            ColorValue::Text(s) => s.parse(),
        }
    }
}

fn parse_hex_color(s: &str) -> Option<Rgb> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Rgb::new(r, g, b))
}

fn named_color(name: &str) -> Option<Rgb> {
    let color = match name.to_lowercase().as_str() {
        "black" => Rgb::new(0, 0, 0),
        "white" => Rgb::new(255, 255, 255),
        "red" => Rgb::new(255, 0, 0),
        "green" => Rgb::new(0, 255, 0),
        "blue" => Rgb::new(0, 0, 255),
        "yellow" => Rgb::new(255, 255, 0),
        "cyan" => Rgb::new(0, 255, 255),
        "magenta" => Rgb::new(255, 0, 255),
        "gray" | "grey" => Rgb::new(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!("#FF5500".parse::<Rgb>(), Ok(Rgb::new(255, 85, 0)));
        assert_eq!("00ff00".parse::<Rgb>(), Ok(Rgb::new(0, 255, 0)));
        assert_eq!("blue".parse::<Rgb>(), Ok(Rgb::new(0, 0, 255)));
        assert!("#GGGGGG".parse::<Rgb>().is_err());
        assert!("#FFF".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_color_value_forms() {
        let colors: Vec<Rgb> =
            serde_json::from_str(r##"[[113, 171, 216], "#d8f2fe", "white"]"##).unwrap();
        assert_eq!(colors[0], Rgb::new(113, 171, 216));
        assert_eq!(colors[1], Rgb::new(216, 242, 254));
        assert_eq!(colors[2], Rgb::WHITE);

        assert!(serde_json::from_str::<Rgb>(r#""not-a-color""#).is_err());
        assert_eq!(serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap(), "[1,2,3]");
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(100, 200, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(50, 150, 100));
        assert_eq!(a.lerp(b, 7.0), b);
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(Rgb::new(255, 8, 0).to_string(), "#ff0800");
    }
}
