//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for scenes built from spheres.
//!
//! The pipeline is: [`Camera`] generates a ray per sample, the scene
//! ([`HittableList`]) finds the nearest hit, the hit's [`Material`] scatters
//! the ray, and [`ray_color`] recurses until the ray escapes to the sky, is
//! absorbed, or runs out of bounces. [`render`] and [`render_parallel`] average
//! the samples into an [`ImageBuffer`] which can be written as PPM or PNG.

mod bucket;
mod camera;
mod hittable;
mod output;
mod material;
mod renderer;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraError, CameraSettings};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use output::{color_to_rgb, save, save_png, write_ppm, ImageBuffer, OutputError, OutputResult};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{ray_color, render, render_pixel, sky_gradient, ConfigError, RenderConfig};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Interval, Point3, Ray, Vec3};
