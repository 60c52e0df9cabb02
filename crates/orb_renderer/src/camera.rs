//! Thin-lens camera for ray generation.

use orb_math::{sampling::random_in_unit_disk, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// User-facing camera placement and lens description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Lens diameter; zero gives a pinhole camera
    pub aperture: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(12.0, 1.8, 9.8),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            vfov: 20.0,
            aperture: 0.1,
            focus_dist: 10.0,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }
}

/// Camera for generating rays into the scene.
///
/// Immutable once built; rays through the same screen point converge on the
/// focal plane whatever lens sample they use.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Derive the viewport from the settings and the image aspect ratio.
    pub fn new(settings: &CameraSettings, aspect_ratio: f32) -> Self {
        let CameraSettings {
            look_from,
            look_at,
            vup,
            vfov,
            aperture,
            focus_dist,
        } = *settings;

        // Calculate camera basis vectors
        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = aspect_ratio * half_height;

        let lower_left_corner = look_from
            - half_width * focus_dist * u
            - half_height * focus_dist * v
            - focus_dist * w;

        Self {
            origin: look_from,
            lower_left_corner,
            horizontal: 2.0 * half_width * focus_dist * u,
            vertical: 2.0 * half_height * focus_dist * v,
            u,
            v,
            w,
            lens_radius: aperture / 2.0,
        }
    }

    /// Generate a ray through normalized screen coordinates `(s, t)`, where
    /// `(0, 0)` is the lower-left corner of the viewport.
    pub fn emit_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
        )
    }

    /// Camera position (center of the lens).
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Orthonormal basis `(u, v, w)`; `w` points away from the target.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}
