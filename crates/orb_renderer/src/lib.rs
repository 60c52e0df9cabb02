//! Orb Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for scenes of spheres: a BVH over shared
//! objects, diffuse/metal/glass materials, procedural textures and a
//! thin-lens camera. Randomness is always passed in explicitly.

mod bvh;
mod camera;
mod hittable;
mod material;
mod renderer;
mod scene;
mod sphere;
mod texture;

pub use bvh::{BuildError, BvhNode};
pub use camera::{Camera, CameraSettings};
pub use hittable::{HitRecord, Hittable};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render, render_pixel, render_with_cancel,
    sky_color, ImageBuffer, RenderConfig, RenderError, SHADOW_ACNE_EPSILON, SKY_COLOR,
};
pub use scene::{random_scene, Scene};
pub use sphere::Sphere;
pub use texture::{Checker, SolidColor, Texture, CHECKER_FREQUENCY};

/// Re-export Vec3 and common math types from orb_math
pub use orb_math::{Aabb, Interval, Ray, Vec3};
