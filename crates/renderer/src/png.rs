//! PNG encoding for composited RGB rasters.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: used when the raster has at most 256
//!   distinct colors, which is the normal case for step ramps.
//! - **Truecolor PNG (color type 2)**: fallback for gradients with more
//!   colors than fit in a palette.
//!
//! Use `encode_png` for automatic mode selection and `write_png` to place
//! the result on disk without ever leaving a partial file behind.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use relief_common::{Dimensions, ReliefError, ReliefResult, Rgb};

use crate::composite::RgbRaster;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Encode a raster, choosing indexed or truecolor output.
pub fn encode_png(raster: &RgbRaster) -> ReliefResult<Vec<u8>> {
    match extract_palette(raster.pixels()) {
        Some((palette, indices)) => create_png_indexed(raster.dims(), &palette, &indices),
        None => create_png_rgb(raster.dims(), &raster.to_bytes()),
    }
}

/// Encode `raster` and write it to `path`.
///
/// The PNG is written to a temporary file next to `path` and renamed over
/// it once complete, so an existing file is only replaced by a whole image.
pub fn write_png(path: &Path, raster: &RgbRaster) -> ReliefResult<()> {
    let png = encode_png(raster)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(&png)?;
    file.flush()?;
    file.persist(path).map_err(|e| ReliefError::Io(e.error))?;

    tracing::info!(
        path = %path.display(),
        dims = %raster.dims(),
        bytes = png.len(),
        "Wrote PNG"
    );
    Ok(())
}

/// Collect a palette of at most 256 colors plus one index per pixel.
///
/// Returns `None` as soon as a 257th color is seen.
fn extract_palette(pixels: &[Rgb]) -> Option<(Vec<Rgb>, Vec<u8>)> {
    let mut color_to_index: HashMap<Rgb, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<Rgb> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len());

    for &color in pixels {
        let index = match color_to_index.get(&color) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push(color);
                color_to_index.insert(color, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(dims: Dimensions, palette: &[Rgb], indices: &[u8]) -> ReliefResult<Vec<u8>> {
    if indices.len() != dims.len() {
        return Err(ReliefError::Encode(format!(
            "{} palette indices for a {} image",
            indices.len(),
            dims
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    write_chunk(&mut png, b"IHDR", &ihdr(dims, 3)?);

    // PLTE chunk (palette)
    let plte_data: Vec<u8> = palette.iter().flat_map(|c| c.to_array()).collect();
    write_chunk(&mut png, b"PLTE", &plte_data);

    // IDAT chunk (image data)
    let idat_data = deflate_scanlines(indices, dims.width, dims.height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a truecolor PNG (color type 2) from interleaved RGB bytes.
pub fn create_png_rgb(dims: Dimensions, rgb: &[u8]) -> ReliefResult<Vec<u8>> {
    if rgb.len() != dims.len() * 3 {
        return Err(ReliefError::Encode(format!(
            "{} RGB bytes for a {} image",
            rgb.len(),
            dims
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(dims, 2)?);
    let idat_data = deflate_scanlines(rgb, dims.width * 3, dims.height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn ihdr(dims: Dimensions, color_type: u8) -> ReliefResult<Vec<u8>> {
    if dims.is_empty() {
        return Err(ReliefError::Encode(format!("cannot encode a {} image", dims)));
    }
    let width = u32::try_from(dims.width)
        .map_err(|_| ReliefError::Encode(format!("width {} too large", dims.width)))?;
    let height = u32::try_from(dims.height)
        .map_err(|_| ReliefError::Encode(format!("height {} too large", dims.height)))?;

    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    Ok(data)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix each `row_bytes`-long scanline with filter type 0 and deflate.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> ReliefResult<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(&uncompressed)
        .map_err(|e| ReliefError::Encode(format!("IDAT compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| ReliefError::Encode(format!("IDAT compression failed: {}", e)))
}
