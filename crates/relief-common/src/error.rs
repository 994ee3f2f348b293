//! Error types for relief-colorizer.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::grid::Dimensions;

/// Result type alias using ReliefError.
pub type ReliefResult<T> = Result<T, ReliefError>;

/// Primary error type for loading, colouring and compositing.
///
/// Every variant is terminal for a run: nothing is written once one of
/// these has been raised.
#[derive(Debug, Error)]
pub enum ReliefError {
    // === Input Errors ===
    #[error("failed to decode raster {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("grid data has {len} values, expected {width}x{height}")]
    GridShape {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("{what} is {found}, expected {expected}")]
    DimensionMismatch {
        what: String,
        expected: Dimensions,
        found: Dimensions,
    },

    // === Configuration Errors ===
    #[error("invalid color ramp: {0}")]
    RampConfig(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no layers configured")]
    NoLayers,

    // === Compositing Errors ===
    #[error("compare predicate used before any base elevation was loaded")]
    MissingBaseElevation,

    #[error("no elevation source: layer has no map and no base map has been loaded yet")]
    NoElevationSource,

    #[error("external mask predicate has no mask raster")]
    MissingMaskRaster,

    #[error("layer {index} ({name})")]
    Layer {
        index: usize,
        name: String,
        #[source]
        source: Box<ReliefError>,
    },

    #[error("{uncovered} of {total} pixels were not painted by any layer")]
    IncompleteCoverage { uncovered: usize, total: usize },

    // === Output Errors ===
    #[error("failed to encode output: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReliefError {
    /// Create a Decode error for the raster at `path`.
    pub fn decode(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(
        what: impl Into<String>,
        expected: Dimensions,
        found: Dimensions,
    ) -> Self {
        Self::DimensionMismatch {
            what: what.into(),
            expected,
            found,
        }
    }

    /// Create a RampConfig error.
    pub fn ramp_config(msg: impl Into<String>) -> Self {
        Self::RampConfig(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Attribute this error to a layer.
    pub fn in_layer(self, index: usize, name: impl Into<String>) -> Self {
        Self::Layer {
            index,
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through layer attribution.
    pub fn root(&self) -> &ReliefError {
        match self {
            Self::Layer { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for ReliefError {
    fn from(err: serde_json::Error) -> Self {
        ReliefError::Config(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ReliefError {
    fn from(err: serde_yaml::Error) -> Self {
        ReliefError::Config(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_error_names_layer() {
        let err = ReliefError::NoElevationSource.in_layer(2, "land");
        let message = err.to_string();
        assert_eq!(message, "layer 2 (land)");
        assert!(std::error::Error::source(&err).is_some());
        assert!(matches!(err.root(), ReliefError::NoElevationSource));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = ReliefError::dimension_mismatch(
            "mask raster",
            Dimensions::new(4, 3),
            Dimensions::new(2, 2),
        );
        assert_eq!(err.to_string(), "mask raster is 2x2, expected 4x3");
    }
}
