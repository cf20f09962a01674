//! Material trait for surface scattering.

use crate::{hittable::HitRecord, Ray};
use lumen_math::{gen_f32, random_in_unit_sphere, random_unit_vector, Vec3, VectorExt};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a scatter event that was not absorbed.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel factor applied to the light carried by `scattered`
    pub attenuation: Color,
    /// The continuation ray, starting at the hit point
    pub scattered: Ray,
}

impl ScatterResult {
    fn new(attenuation: Color, origin: Vec3, direction: Vec3) -> Self {
        Self {
            attenuation,
            scattered: Ray::new(origin, direction),
        }
    }
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials are immutable once built and are shared between every object
/// that uses them.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns the attenuation and scattered ray, or `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult::new(self.albedo, rec.p, scatter_direction))
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, capped at 1.0
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }

    /// The effective fuzz after clamping.
    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = ray_in.direction().unit_vector().reflect(rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz may push the reflection below the surface
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult::new(self.albedo, rec.p, scattered_dir))
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, eta_ratio: f32) -> f32 {
        let r0 = ((1.0 - eta_ratio) / (1.0 + eta_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().unit_vector();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                unit_direction.reflect(rec.normal)
            } else {
                unit_direction.refract(rec.normal, refraction_ratio)
            };

        Some(ScatterResult::new(Color::ONE, rec.p, direction))
    }
}
