//! Image buffer, tone mapping and file output.
//!
//! Pixels are stored as averaged linear colors. Conversion to 8-bit applies
//! gamma 2 and clamps each channel to [0, 0.999] before scaling by 256, so an
//! oversaturated channel maps to exactly 255.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Color;
use lumen_math::Interval;
use thiserror::Error;

/// Channel range before scaling to 8 bits.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Apply gamma correction (gamma = 2.0).
#[inline]
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let channel = |c: f32| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Simple image buffer for storing render output.
///
/// Row 0 is the top of the image.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width as usize) * (height as usize)],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert to tone-mapped RGB bytes in row-major order.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&c| color_to_rgb(c)).collect()
    }
}

/// Write the image as plain-text PPM (P3): header, then one pixel per line.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: W) -> OutputResult<()> {
    let mut writer = BufWriter::new(writer);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for &color in &image.pixels {
        let [r, g, b] = color_to_rgb(color);
        writeln!(writer, "{r} {g} {b}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the image as an 8-bit PNG.
pub fn save_png(image: &ImageBuffer, path: impl AsRef<Path>) -> OutputResult<()> {
    let buffer = image::RgbImage::from_raw(image.width, image.height, image.to_rgb())
        .ok_or_else(|| OutputError::UnsupportedFormat("pixel count does not match dimensions".into()))?;
    buffer.save(path)?;
    Ok(())
}

/// Save the image, choosing the format from the file extension (`.ppm` or `.png`).
pub fn save(image: &ImageBuffer, path: impl AsRef<Path>) -> OutputResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => write_ppm(image, File::create(path)?),
        "png" => save_png(image, path),
        other => Err(OutputError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
