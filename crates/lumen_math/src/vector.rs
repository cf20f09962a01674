//! Vector helpers on top of `glam::Vec3`.
//!
//! glam already covers arithmetic, dot/cross products and lengths. This module
//! adds the handful of operations a path tracer needs on top: degeneracy tests,
//! mirror reflection, Snell refraction and the random sampling routines.
//!
//! All sampling takes an explicit generator so that renders are reproducible
//! and workers never share random state.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Threshold below which every component counts as zero.
const NEAR_ZERO: f32 = 1e-8;

/// Path tracing operations on 3-component vectors.
pub trait VectorExt {
    /// True if every component's magnitude is below 1e-8.
    fn near_zero(&self) -> bool;

    /// The vector scaled to unit length.
    ///
    /// The vector must be non-zero; a zero vector yields NaN components.
    fn unit_vector(&self) -> Vec3;

    /// Reflect about the normal `n`: `v - 2 (v . n) n`.
    fn reflect(&self, n: Vec3) -> Vec3;

    /// Refract a unit vector through a surface with normal `n`.
    ///
    /// `eta_ratio` is the incident index over the transmitted index.
    fn refract(&self, n: Vec3, eta_ratio: f32) -> Vec3;
}

impl VectorExt for Vec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        self.x.abs() < NEAR_ZERO && self.y.abs() < NEAR_ZERO && self.z.abs() < NEAR_ZERO
    }

    #[inline]
    fn unit_vector(&self) -> Vec3 {
        debug_assert!(*self != Vec3::ZERO, "cannot normalize a zero vector");
        *self / self.length()
    }

    #[inline]
    fn reflect(&self, n: Vec3) -> Vec3 {
        *self - 2.0 * self.dot(n) * n
    }

    #[inline]
    fn refract(&self, n: Vec3, eta_ratio: f32) -> Vec3 {
        let cos_theta = (-*self).dot(n).min(1.0);
        let r_out_perp = eta_ratio * (*self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }
}

/// Uniform random f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform random f32 in [min, max).
#[inline]
pub fn gen_f32_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Random vector with each component in [0, 1).
pub fn random_vec3(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
}

/// Random vector with each component in [min, max).
pub fn random_vec3_range(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        gen_f32_range(rng, min, max),
        gen_f32_range(rng, min, max),
        gen_f32_range(rng, min, max),
    )
}

/// Random point strictly inside the unit sphere (rejection sampled).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec3_range(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random direction uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        // A point this close to the origin has no usable direction
        if !p.near_zero() {
            return p.unit_vector();
        }
    }
}

/// Random point inside the unit disk in the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32_range(rng, -1.0, 1.0),
            gen_f32_range(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
