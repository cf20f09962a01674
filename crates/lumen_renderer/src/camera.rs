//! Camera for ray generation.

use lumen_math::{random_in_unit_disk, Point3, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when camera settings describe a degenerate view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("look_from and look_at are the same point")]
    ZeroViewDirection,

    #[error("view_up {0} is zero or parallel to the view direction")]
    DegenerateViewUp(Vec3),

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),

    #[error("aperture must be non-negative, got {0}")]
    InvalidAperture(f32),

    #[error("focus distance must be positive, got {0}")]
    InvalidFocusDistance(f32),
}

/// The seven parameters a camera is built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera position
    pub look_from: Point3,
    /// Point the camera looks at
    pub look_at: Point3,
    /// Up hint, need not be orthogonal to the view direction
    pub view_up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Viewport width over height
    pub aspect_ratio: f32,
    /// Lens diameter; 0 disables depth of field
    pub aperture: f32,
    /// Distance from the camera to the plane of perfect focus
    pub focus_dist: f32,
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, view_up: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.view_up = view_up;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the viewport aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            view_up: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }
}

/// Thin-lens camera mapping viewport coordinates to world-space rays.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3,
    upper_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    // Orthonormal basis: u right, v up, w backwards
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Derive the viewport geometry from the camera settings.
    pub fn new(settings: &CameraSettings) -> Result<Self, CameraError> {
        let CameraSettings {
            look_from,
            look_at,
            view_up,
            vfov,
            aspect_ratio,
            aperture,
            focus_dist,
        } = *settings;

        if !(vfov > 0.0 && vfov < 180.0) {
            return Err(CameraError::InvalidFov(vfov));
        }
        if !(aspect_ratio > 0.0 && aspect_ratio.is_finite()) {
            return Err(CameraError::InvalidAspectRatio(aspect_ratio));
        }
        if !(aperture >= 0.0) {
            return Err(CameraError::InvalidAperture(aperture));
        }
        if !(focus_dist > 0.0) {
            return Err(CameraError::InvalidFocusDistance(focus_dist));
        }

        let view = look_from - look_at;
        if view.length_squared() == 0.0 {
            return Err(CameraError::ZeroViewDirection);
        }
        let w = view.normalize();

        let right = view_up.cross(w);
        if right.length_squared() < 1e-12 {
            return Err(CameraError::DegenerateViewUp(view_up));
        }
        let u = right.normalize();
        let v = w.cross(u);

        // Viewport dimensions at unit distance
        let h = (vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * aspect_ratio;

        // Scaling by focus_dist moves the viewport onto the focal plane without changing the framing
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let upper_left_corner = look_from - horizontal / 2.0 + vertical / 2.0 - focus_dist * w;

        Ok(Self {
            origin: look_from,
            upper_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: aperture / 2.0,
        })
    }

    /// Generate a ray through viewport coordinates `(s, t)`.
    ///
    /// `s` runs left to right and `t` bottom to top, both roughly in [0, 1].
    /// The origin is jittered across the lens disk when the aperture is open.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let ray_origin = if self.lens_radius <= 0.0 {
            self.origin
        } else {
            self.defocus_disk_sample(rng)
        };

        let target = self.upper_left_corner + s * self.horizontal - (1.0 - t) * self.vertical;
        Ray::new(ray_origin, target - ray_origin)
    }

    /// Sample a point on the lens disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = self.lens_radius * random_in_unit_disk(rng);
        self.origin + p.x * self.u + p.y * self.v
    }

    /// Camera position (center of the lens).
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Upper-left corner of the viewport on the focal plane.
    pub fn upper_left_corner(&self) -> Point3 {
        self.upper_left_corner
    }

    /// Unit vector pointing from the scene back towards the camera.
    pub fn backward(&self) -> Vec3 {
        self.w
    }

    /// Lens radius (half the aperture).
    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
