//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, ScatterResult};
use orb_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A dummy material used for HitRecord::default().
/// Always absorbs light (returns None from scatter).
struct DummyMaterial;

impl Material for DummyMaterial {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }
}

/// Static dummy material instance for Default impl.
static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-object intersection.
///
/// Lives only as long as the call that produced it; it carries the hit from the
/// scene (or BVH) to the material of the surface that was hit.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface coordinates, reserved for texturing. Spheres leave them at zero.
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl Default for HitRecord<'_> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
        }
    }
}

impl HitRecord<'_> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        // Normal always points against the ray
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record with the closest hit.
    /// On a miss the record is left untouched.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Get the axis-aligned bounding box of this object, if it has one.
    fn bounding_box(&self) -> Option<Aabb>;
}
