//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by a maximum depth
//! - Sky gradient background
//! - Anti-aliasing via multi-sampling

use std::time::Instant;

use crate::{Camera, Color, Hittable, ImageBuffer, Ray};
use lumen_math::{gen_f32, Interval};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nearest accepted hit distance; avoids self-intersection at the previous hit point.
const T_MIN: f32 = 0.001;

/// Errors in the render configuration, reported before any ray is traced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    NoSamples,

    #[error("bucket size must be at least 1")]
    ZeroBucketSize,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub image_width: u32,
    /// Output image height in pixels
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Seed for every random draw made while rendering
    pub seed: u64,
    /// Edge length of the square tiles used by the parallel renderer
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            bucket_size: crate::DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Check the configuration for values that would make the render meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ConfigError::EmptyImage {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::NoSamples);
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::ZeroBucketSize);
        }
        Ok(())
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and multiplying in their attenuation.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Bounce budget exhausted: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Compute sky gradient background: white at the horizon, light blue overhead.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` are image coordinates with `y = 0` the top row. Returns the
/// average of all samples in linear color.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width_span = config.image_width.saturating_sub(1).max(1) as f32;
    let height_span = config.image_height.saturating_sub(1).max(1) as f32;
    // Viewport t grows upwards while image rows grow downwards
    let row_from_bottom = (config.image_height - 1 - y) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width_span;
        let t = (row_from_bottom + gen_f32(rng)) / height_span;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Render the entire scene to an image buffer on the calling thread.
///
/// Rows are traced top to bottom, columns left to right.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Result<ImageBuffer, ConfigError> {
    config.validate()?;
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth
    );
    let start = Instant::now();

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    for y in 0..config.image_height {
        log::trace!("Scanlines remaining: {}", config.image_height - y);
        for x in 0..config.image_width {
            let color = render_pixel(camera, world, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
