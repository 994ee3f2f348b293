//! Layer configuration.
//!
//! Layers are written as flat records (YAML or JSON) and validated into
//! closed sum types when the document is loaded, so the compositor never
//! has to interpret loosely-typed keys.
//!
//! ```yaml
//! output: color_map.png
//! layers:
//!   - name: sea
//!     basemap: elev_map.png
//!     max: 10000
//!     min: -10000
//!     palette: sea
//!   - name: land
//!     palette: land
//!     above: 0.0
//! ```

use std::path::{Path, PathBuf};

use relief_common::{ReliefError, ReliefResult, Rgb};
use serde::{Deserialize, Serialize};

use crate::elevation::ValueScale;
use crate::mask::{Compare, MaskSpec};
use crate::palettes::Palette;
use crate::ramp::{ColorRamp, RampMode};

/// Whether a layer's own elevation raster replaces the shared base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRole {
    /// Used by this layer only.
    Local,
    /// Used by this layer and kept as the base for later layers.
    Base,
}

/// An elevation raster a layer loads for itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationSource {
    pub path: PathBuf,
    pub scale: ValueScale,
    pub role: SourceRole,
}

/// How a layer colors its pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgb),
    Ramp(ColorRamp),
}

/// One validated compositing layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    /// `None` reuses the current base elevation.
    pub source: Option<ElevationSource>,
    pub paint: Paint,
    pub mask: MaskSpec,
}

impl Layer {
    pub fn new(name: impl Into<String>, paint: Paint) -> Self {
        Self {
            name: name.into(),
            source: None,
            paint,
            mask: MaskSpec::default(),
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>, scale: ValueScale, role: SourceRole) -> Self {
        self.source = Some(ElevationSource {
            path: path.into(),
            scale,
            role,
        });
        self
    }

    pub fn with_mask(mut self, mask: MaskSpec) -> Self {
        self.mask = mask;
        self
    }
}

/// A layer as written in a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    // Elevation source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basemap: Option<PathBuf>,

    // Value scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black: Option<f64>,

    // Coloring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<Rgb>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onecolor: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Palette>,
    #[serde(default)]
    pub gradient: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradexp: Option<f64>,

    // Masking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare: Option<Compare>,
}

impl LayerRecord {
    /// Display name used in logs and errors.
    pub fn display_name(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{}", index))
    }

    /// Validate into a `Layer`, resolving relative paths against `base_dir`.
    ///
    /// Errors are attributed to the layer's index and name.
    pub fn to_layer(&self, index: usize, base_dir: &Path) -> ReliefResult<Layer> {
        self.validate(base_dir)
            .map_err(|e| e.in_layer(index, self.display_name(index)))
            .map(|(source, paint, mask)| Layer {
                name: self.display_name(index),
                source,
                paint,
                mask,
            })
    }

    fn validate(&self, base_dir: &Path) -> ReliefResult<(Option<ElevationSource>, Paint, MaskSpec)> {
        let source = self.source(base_dir)?;
        let paint = self.paint()?;
        let mask = MaskSpec {
            external: self.mask.as_ref().map(|p| base_dir.join(p)),
            above: self.above,
            below: self.below,
            compare: self.compare,
        };
        Ok((source, paint, mask))
    }

    fn scale(&self) -> ReliefResult<Option<ValueScale>> {
        let observed = pair("max", self.max, "min", self.min)?
            .map(|(max, min)| ValueScale::Observed { min, max });
        let full = pair("white", self.white, "black", self.black)?
            .map(|(white, black)| ValueScale::FullScale { black, white });

        match (observed, full) {
            (Some(_), Some(_)) => Err(ReliefError::config(
                "`max`/`min` and `white`/`black` are mutually exclusive",
            )),
            (scale, None) | (None, scale) => Ok(scale),
        }
    }

    fn source(&self, base_dir: &Path) -> ReliefResult<Option<ElevationSource>> {
        let scale = self.scale()?;
        let (path, role) = match (&self.map, &self.basemap) {
            (Some(_), Some(_)) => {
                return Err(ReliefError::config("`map` and `basemap` are mutually exclusive"));
            }
            (Some(path), None) => (path, SourceRole::Local),
            (None, Some(path)) => (path, SourceRole::Base),
            (None, None) => {
                if scale.is_some() {
                    return Err(ReliefError::config(
                        "a value scale was given without `map` or `basemap`",
                    ));
                }
                return Ok(None);
            }
        };

        let scale = scale.ok_or_else(|| {
            ReliefError::config("an elevation map needs `max`/`min` or `white`/`black`")
        })?;

        Ok(Some(ElevationSource {
            path: base_dir.join(path),
            scale,
            role,
        }))
    }

    fn paint(&self) -> ReliefResult<Paint> {
        let explicit = match (&self.steps, &self.colors) {
            (Some(steps), Some(colors)) => Some((steps.clone(), colors.clone())),
            (None, None) => None,
            (Some(_), None) => return Err(ReliefError::config("`steps` given without `colors`")),
            (None, Some(_)) => return Err(ReliefError::config("`colors` given without `steps`")),
        };

        let choices = [explicit.is_some(), self.onecolor.is_some(), self.palette.is_some()]
            .iter()
            .filter(|&&set| set)
            .count();
        if choices != 1 {
            return Err(paint_choice_error());
        }

        if self.gradexp.is_some() && !self.gradient {
            return Err(ReliefError::config("`gradexp` requires `gradient: true`"));
        }

        if let Some(color) = self.onecolor {
            if self.gradient {
                return Err(ReliefError::config("`gradient` cannot be used with `onecolor`"));
            }
            return Ok(Paint::Solid(color));
        }

        let mode = if self.gradient {
            RampMode::Gradient { warp: self.gradexp }
        } else {
            RampMode::Step
        };

        let ramp = match (explicit, self.palette) {
            (Some((steps, colors)), _) => ColorRamp::new(steps, colors, mode)?,
            (None, Some(palette)) => palette.ramp(mode)?,
            (None, None) => return Err(paint_choice_error()),
        };
        Ok(Paint::Ramp(ramp))
    }
}

fn paint_choice_error() -> ReliefError {
    ReliefError::config("exactly one of `steps`+`colors`, `onecolor` or `palette` is required")
}

fn pair(
    high_key: &str,
    high: Option<f64>,
    low_key: &str,
    low: Option<f64>,
) -> ReliefResult<Option<(f64, f64)>> {
    match (high, low) {
        (Some(h), Some(l)) => Ok(Some((h, l))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ReliefError::config(format!(
            "`{}` requires `{}`",
            high_key, low_key
        ))),
        (None, Some(_)) => Err(ReliefError::config(format!(
            "`{}` requires `{}`",
            low_key, high_key
        ))),
    }
}

/// A complete colorizer configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerDocument {
    /// Output PNG path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Fill for pixels no layer paints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,

    /// Fail instead of filling unpainted pixels.
    #[serde(default)]
    pub strict_coverage: bool,

    /// Layers in the order they are applied.
    pub layers: Vec<LayerRecord>,
}

impl LayerDocument {
    /// Parse a document from YAML.
    pub fn from_yaml(yaml: &str) -> ReliefResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> ReliefResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document, choosing the parser from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> ReliefResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Validate every layer, resolving relative paths against `base_dir`.
    pub fn layers(&self, base_dir: &Path) -> ReliefResult<Vec<Layer>> {
        if self.layers.is_empty() {
            return Err(ReliefError::NoLayers);
        }
        self.layers
            .iter()
            .enumerate()
            .map(|(index, record)| record.to_layer(index, base_dir))
            .collect()
    }
}
