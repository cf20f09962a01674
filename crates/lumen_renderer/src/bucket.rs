//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Every bucket owns its random
//! generator, seeded from the render seed and the bucket index, so the final
//! image does not depend on thread count or scheduling.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::render_pixel;
use crate::{Camera, Color, ConfigError, Hittable, ImageBuffer, RenderConfig};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's private generator.
    fn seed(&self, render_seed: u64) -> u64 {
        render_seed ^ (self.index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets covering the image in row-major order, top row first.
///
/// Buckets on the right and bottom edges are clipped to the image.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    buckets
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into their place in the full image.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let mut pixels = self.pixels.iter();
        for local_y in 0..self.bucket.height {
            for local_x in 0..self.bucket.width {
                if let Some(&color) = pixels.next() {
                    image.set(self.bucket.x + local_x, self.bucket.y + local_y, color);
                }
            }
        }
    }
}

/// Render a single bucket.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(camera, world, global_x, global_y, config, &mut rng));
        }
    }

    log::debug!(
        "Bucket {} ({}, {}) {}x{} done",
        bucket.index,
        bucket.x,
        bucket.y,
        bucket.width,
        bucket.height
    );
    BucketResult::new(*bucket, pixels)
}

/// Render the entire scene, spreading buckets across the current rayon pool.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> Result<ImageBuffer, ConfigError> {
    config.validate()?;

    let buckets = generate_buckets(config.image_width, config.image_height, config.bucket_size);
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} in {} buckets on {} threads",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        rayon::current_num_threads()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, world, config))
        .collect();

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    for result in &results {
        result.write_into(&mut image);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraSettings, HittableList, Lambertian, Material, Sphere, Vec3};
    use std::sync::Arc;

    fn scene() -> (Camera, HittableList) {
        let settings = CameraSettings::default()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_aspect_ratio(1.0);
        let camera = Camera::new(&settings).expect("valid camera");

        let gray: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, gray.clone())));
        world.add(Box::new(Sphere::new(Vec3::new(0.0, -101.0, -3.0), 100.0, gray)));
        (camera, world)
    }

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 70, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 70);
        assert_eq!(buckets[3], Bucket::new(64, 64, 36, 6, 3));
    }

    #[test]
    fn test_buckets_are_row_major() {
        let buckets = generate_buckets(192, 128, 64);
        let origins: Vec<(u32, u32)> = buckets.iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(origins, [(0, 0), (64, 0), (128, 0), (0, 64), (64, 64), (128, 64)]);
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_bucket_seeds_differ() {
        let buckets = generate_buckets(128, 64, 64);
        assert_ne!(buckets[0].seed(5), buckets[1].seed(5));
        assert_eq!(buckets[0].seed(5), buckets[0].seed(5));
    }

    #[test]
    fn test_render_bucket_pixel_count() {
        let (camera, world) = scene();
        let config = RenderConfig {
            image_width: 20,
            image_height: 10,
            samples_per_pixel: 2,
            max_depth: 4,
            ..RenderConfig::default()
        };
        let bucket = Bucket::new(16, 8, 4, 2, 0);

        let result = render_bucket(&bucket, &camera, &world, &config);
        assert_eq!(result.pixels.len(), 8);
        assert_eq!(result.bucket, bucket);
    }

    #[test]
    fn test_parallel_render_is_deterministic() {
        let (camera, world) = scene();
        let config = RenderConfig {
            image_width: 24,
            image_height: 18,
            samples_per_pixel: 3,
            max_depth: 6,
            seed: 1234,
            bucket_size: 7,
        };

        let a = render_parallel(&camera, &world, &config).expect("valid config");

        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .expect("thread pool");
        let b = single
            .install(|| render_parallel(&camera, &world, &config))
            .expect("valid config");

        assert_eq!(a.pixels, b.pixels);
        assert!(a.pixels.iter().any(|c| c.max_element() > 0.0));
    }

    #[test]
    fn test_parallel_render_zero_depth_is_black() {
        let (camera, world) = scene();
        let config = RenderConfig {
            image_width: 9,
            image_height: 9,
            samples_per_pixel: 2,
            max_depth: 0,
            bucket_size: 4,
            ..RenderConfig::default()
        };

        let image = render_parallel(&camera, &world, &config).expect("valid config");
        assert!(image.to_rgb().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_parallel_render_rejects_zero_samples() {
        let (camera, world) = scene();
        let config = RenderConfig {
            samples_per_pixel: 0,
            ..RenderConfig::default()
        };
        assert_eq!(
            render_parallel(&camera, &world, &config).err(),
            Some(ConfigError::NoSamples)
        );
    }
}
