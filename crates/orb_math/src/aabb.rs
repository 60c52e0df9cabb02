use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Stored as two corners. For every axis `min[axis] <= max[axis]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from its minimum and maximum corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all(), "inverted box {min:?}..{max:?}");
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. A zero direction component divides to a signed infinity and the
    /// min/max narrowing tolerates it, so no axis needs a special case.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let inv_d = 1.0 / r.direction[axis];
            let ta = (self.min[axis] - r.origin[axis]) * inv_d;
            let tb = (self.max[axis] - r.origin[axis]) * inv_d;

            ray_t.min = ta.min(tb).max(ray_t.min);
            ray_t.max = ta.max(tb).min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Total area of the six faces.
    pub fn surface_area(&self) -> f32 {
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let d = self.max - self.min;

        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }
}
