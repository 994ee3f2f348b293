//! Run settings.
//!
//! A run is described by the layer document plus process-level overrides
//! from the command line or environment. Overrides win over the document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use relief_common::Rgb;
use renderer::layer::{Layer, LayerDocument};

/// Output file used when neither the document nor the command line names one.
pub const DEFAULT_OUTPUT: &str = "color_map.png";

/// Values supplied outside the layer document.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub background: Option<Rgb>,
    pub strict_coverage: bool,
}

/// Everything needed to run the compositor once.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub layers: Vec<Layer>,
    pub output: PathBuf,
    pub background: Rgb,
    pub strict_coverage: bool,
}

impl RunConfig {
    /// Load the layer document at `path` and apply `overrides`.
    pub fn load(path: &Path, overrides: Overrides) -> Result<Self> {
        let document = LayerDocument::from_file(path)
            .with_context(|| format!("Failed to read layer document {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::resolve(document, base_dir, overrides)
            .with_context(|| format!("Invalid layer document {}", path.display()))
    }

    /// Validate `document` and merge it with `overrides`.
    ///
    /// Paths inside the document, including its `output`, are relative to
    /// `base_dir`. An output given as an override is used as is.
    pub fn resolve(document: LayerDocument, base_dir: &Path, overrides: Overrides) -> Result<Self> {
        let layers = document.layers(base_dir)?;

        let output = match (overrides.output, document.output) {
            (Some(output), _) => output,
            (None, Some(output)) => base_dir.join(output),
            (None, None) => PathBuf::from(DEFAULT_OUTPUT),
        };

        Ok(Self {
            layers,
            output,
            background: overrides.background.or(document.background).unwrap_or(Rgb::BLACK),
            strict_coverage: overrides.strict_coverage || document.strict_coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "output: out.png\nbackground: '#0000ff'\nlayers:\n  - basemap: elev.png\n    max: 1\n    min: 0\n    onecolor: green\n";

    fn document(yaml: &str) -> LayerDocument {
        LayerDocument::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_document_values_used_without_overrides() {
        let config = RunConfig::resolve(document(DOCUMENT), Path::new("/maps"), Overrides::default()).unwrap();
        assert_eq!(config.output, PathBuf::from("/maps/out.png"));
        assert_eq!(config.background, Rgb::new(0, 0, 255));
        assert!(!config.strict_coverage);
        assert_eq!(config.layers.len(), 1);
        assert_eq!(
            config.layers[0].source.as_ref().unwrap().path,
            PathBuf::from("/maps/elev.png")
        );
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            output: Some(PathBuf::from("elsewhere.png")),
            background: Some(Rgb::WHITE),
            strict_coverage: true,
        };
        let config = RunConfig::resolve(document(DOCUMENT), Path::new("/maps"), overrides).unwrap();
        assert_eq!(config.output, PathBuf::from("elsewhere.png"));
        assert_eq!(config.background, Rgb::WHITE);
        assert!(config.strict_coverage);
    }

    #[test]
    fn test_defaults() {
        let yaml = "layers:\n  - basemap: elev.png\n    max: 1\n    min: 0\n    onecolor: green\n";
        let config = RunConfig::resolve(document(yaml), Path::new(""), Overrides::default()).unwrap();
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.background, Rgb::BLACK);
    }

    #[test]
    fn test_strict_from_document_is_kept() {
        let yaml = "strict_coverage: true\nlayers:\n  - basemap: elev.png\n    max: 1\n    min: 0\n    onecolor: green\n";
        let config = RunConfig::resolve(document(yaml), Path::new(""), Overrides::default()).unwrap();
        assert!(config.strict_coverage);
    }

    #[test]
    fn test_load_reports_path() {
        let err = RunConfig::load(Path::new("/no/such/layers.yaml"), Overrides::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("/no/such/layers.yaml"));
    }

    #[test]
    fn test_invalid_layer_rejected() {
        let yaml = "layers:\n  - onecolor: green\n    palette: sea\n";
        let err = RunConfig::resolve(document(yaml), Path::new(""), Overrides::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("layer 0"));
    }
}
