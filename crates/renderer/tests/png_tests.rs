//! Tests for PNG encoding of composited rasters.
//!
//! Covers format selection (indexed vs truecolor), decoding the output back
//! with an independent decoder, and replacing files on disk.

use relief_common::{Dimensions, Rgb};
use renderer::composite::RgbRaster;
use renderer::png::{create_png_indexed, create_png_rgb, encode_png, write_png};
use test_utils::colors::{BLUE, GREEN, RED};
use test_utils::{read_rgb_png, temp_dir};

// ============================================================================
// Helper functions
// ============================================================================

/// Offset of the IHDR color type byte: signature, chunk header, then
/// width, height and bit depth.
const COLOR_TYPE_OFFSET: usize = 8 + 8 + 9;

fn raster(width: usize, height: usize, pixels: Vec<Rgb>) -> RgbRaster {
    RgbRaster::new(Dimensions::new(width, height), pixels).unwrap()
}

/// A raster with `count` distinct colors, one per pixel.
fn distinct_colors(count: usize) -> RgbRaster {
    let pixels = (0..count)
        .map(|i| Rgb::new((i % 256) as u8, (i / 256) as u8, 7))
        .collect();
    raster(count, 1, pixels)
}

fn decode(png: &[u8]) -> (u32, u32, Vec<Rgb>) {
    let dir = temp_dir();
    let path = dir.path().join("decoded.png");
    std::fs::write(&path, png).unwrap();
    read_rgb_png(&path)
}

// ============================================================================
// Format selection tests
// ============================================================================

#[test]
fn test_few_colors_use_indexed() {
    let png = encode_png(&raster(2, 2, vec![RED, GREEN, GREEN, RED])).unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    assert_eq!(png[COLOR_TYPE_OFFSET], 3);
}

#[test]
fn test_exactly_256_colors_use_indexed() {
    let png = encode_png(&distinct_colors(256)).unwrap();
    assert_eq!(png[COLOR_TYPE_OFFSET], 3);
}

#[test]
fn test_257_colors_fall_back_to_truecolor() {
    let png = encode_png(&distinct_colors(257)).unwrap();
    assert_eq!(png[COLOR_TYPE_OFFSET], 2);
}

// ============================================================================
// Decoding tests
// ============================================================================

#[test]
fn test_indexed_output_decodes_to_same_pixels() {
    let pixels = vec![RED, GREEN, BLUE, BLUE, GREEN, RED];
    let png = encode_png(&raster(3, 2, pixels.clone())).unwrap();

    let (width, height, decoded) = decode(&png);
    assert_eq!((width, height), (3, 2));
    assert_eq!(decoded, pixels);
}

#[test]
fn test_truecolor_output_decodes_to_same_pixels() {
    let source = distinct_colors(300);
    let png = encode_png(&source).unwrap();

    let (width, height, decoded) = decode(&png);
    assert_eq!((width, height), (300, 1));
    assert_eq!(decoded, source.pixels());
}

#[test]
fn test_single_pixel() {
    let png = encode_png(&raster(1, 1, vec![BLUE])).unwrap();
    let (_, _, decoded) = decode(&png);
    assert_eq!(decoded, vec![BLUE]);
}

#[test]
fn test_step_output_is_smaller_than_truecolor() {
    let pixels: Vec<Rgb> = (0..256 * 256)
        .map(|i| if (i % 256) < 128 { BLUE } else { GREEN })
        .collect();
    let source = raster(256, 256, pixels);

    let indexed = encode_png(&source).unwrap();
    let truecolor = create_png_rgb(source.dims(), &source.to_bytes()).unwrap();
    assert!(indexed.len() < truecolor.len());
}

// ============================================================================
// Validation tests
// ============================================================================

#[test]
fn test_mismatched_lengths_rejected() {
    let dims = Dimensions::new(2, 2);
    assert!(create_png_rgb(dims, &[0; 11]).is_err());
    assert!(create_png_indexed(dims, &[RED], &[0; 3]).is_err());
}

#[test]
fn test_raster_length_checked() {
    assert!(RgbRaster::new(Dimensions::new(2, 2), vec![RED; 3]).is_err());
}

// ============================================================================
// File output tests
// ============================================================================

#[test]
fn test_write_png_creates_and_replaces() {
    let dir = temp_dir();
    let path = dir.path().join("color_map.png");

    write_png(&path, &raster(2, 1, vec![RED, GREEN])).unwrap();
    assert_eq!(read_rgb_png(&path).2, vec![RED, GREEN]);

    write_png(&path, &raster(1, 1, vec![BLUE])).unwrap();
    let (width, height, pixels) = read_rgb_png(&path);
    assert_eq!((width, height), (1, 1));
    assert_eq!(pixels, vec![BLUE]);

    // No temporary files left beside the output.
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_write_png_missing_directory_fails() {
    let dir = temp_dir();
    let path = dir.path().join("missing").join("out.png");
    assert!(write_png(&path, &raster(1, 1, vec![RED])).is_err());
}
