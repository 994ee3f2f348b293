//! Relief colorizer.
//!
//! Reads a layer document, composites the layers over greyscale elevation
//! rasters and writes the result as a PNG.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use relief_common::Rgb;
use renderer::composite::Compositor;
use renderer::elevation::ImageFileReader;
use renderer::png::write_png;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use config::{Overrides, RunConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "relief-colorize")]
#[command(about = "Composite elevation rasters into a colored relief map")]
struct Args {
    /// Layer document (YAML, or JSON with a .json extension)
    #[arg(short, long, env = "RELIEF_CONFIG")]
    config: PathBuf,

    /// Output PNG path, overriding the document
    #[arg(short, long, env = "RELIEF_OUTPUT")]
    output: Option<PathBuf>,

    /// Fill for pixels no layer paints, e.g. "#000000"
    #[arg(long, env = "RELIEF_BACKGROUND")]
    background: Option<Rgb>,

    /// Fail if any pixel is left unpainted
    #[arg(long, env = "RELIEF_STRICT_COVERAGE")]
    strict_coverage: bool,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "RELIEF_LOG_FORMAT")]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format);

    let overrides = Overrides {
        output: args.output,
        background: args.background,
        strict_coverage: args.strict_coverage,
    };
    let config = RunConfig::load(&args.config, overrides)?;

    info!(
        config = %args.config.display(),
        layers = config.layers.len(),
        output = %config.output.display(),
        "Starting relief colorizer"
    );

    run(&config)
}

fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Composite every layer and write the PNG. Nothing is written on failure.
fn run(config: &RunConfig) -> Result<()> {
    let canvas = Compositor::new(ImageFileReader)
        .composite(&config.layers)
        .context("Compositing failed")?;

    let raster = if config.strict_coverage {
        canvas.finish_strict().context("Output not fully covered")?
    } else {
        canvas.finish(config.background)
    };

    write_png(&config.output, &raster)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    info!(output = %config.output.display(), dims = %raster.dims(), "Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use clap::CommandFactory;
    use test_utils::colors::{BLUE, GREEN};
    use test_utils::{read_rgb_png, temp_dir, write_grey_png};

    fn write_document(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("layers.yaml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "relief-colorize",
            "--config",
            "layers.yaml",
            "--background",
            "#102030",
            "--strict-coverage",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("layers.yaml"));
        assert_eq!(args.background, Some(Rgb::new(16, 32, 48)));
        assert!(args.strict_coverage);
        assert_eq!(args.log_format, LogFormat::Json);
    }

    #[test]
    fn test_bad_background_rejected() {
        let result = Args::try_parse_from([
            "relief-colorize",
            "--config",
            "layers.yaml",
            "--background",
            "not-a-color",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_writes_png() {
        let dir = temp_dir();
        write_grey_png(dir.path(), "elev.png", 2, 1, &[0, 255]);
        let doc = write_document(
            dir.path(),
            "output: relief.png\nlayers:\n  - basemap: elev.png\n    max: 100\n    min: -100\n    steps: [0]\n    colors: [blue, green]\n",
        );

        let config = RunConfig::load(&doc, Overrides::default()).unwrap();
        run(&config).unwrap();

        let (width, height, pixels) = read_rgb_png(&dir.path().join("relief.png"));
        assert_eq!((width, height), (2, 1));
        assert_eq!(pixels, vec![BLUE, GREEN]);
    }

    #[test]
    fn test_strict_run_leaves_existing_output() {
        let dir = temp_dir();
        write_grey_png(dir.path(), "elev.png", 2, 1, &[0, 255]);
        let doc = write_document(
            dir.path(),
            "output: relief.png\nlayers:\n  - basemap: elev.png\n    max: 100\n    min: -100\n    onecolor: green\n    above: 0\n",
        );
        let output = dir.path().join("relief.png");
        std::fs::write(&output, b"previous").unwrap();

        let overrides = Overrides {
            strict_coverage: true,
            ..Default::default()
        };
        let config = RunConfig::load(&doc, overrides).unwrap();
        let err = run(&config).unwrap_err();

        assert!(format!("{:#}", err).contains("not painted"));
        assert_eq!(std::fs::read(&output).unwrap(), b"previous");
    }
}
