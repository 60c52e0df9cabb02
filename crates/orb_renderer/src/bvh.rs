//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared objects. Every node holds exactly two children and
//! the union of their boxes; traversal prunes whole subtrees whose box the ray
//! misses. Built once, immutable afterwards.

use crate::{HitRecord, Hittable, Scene};
use orb_math::{Aabb, Interval, Ray};
use rand::{Rng, RngCore};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building a BVH.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("cannot build a BVH over an empty object list")]
    EmptyScene,

    #[error("object {index} has no bounding box")]
    MissingBoundingBox { index: usize },
}

/// BVH node with two children and their cached union box.
///
/// A subtree with a single member stores that member as both children (the
/// same `Arc`, not a copy).
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

/// An object paired with its bounding box, looked up once before building.
type Bounded = (Arc<dyn Hittable>, Aabb);

impl BvhNode {
    /// Build a BVH over the scene's objects.
    ///
    /// The split axis at every node is drawn from `rng`, so a fixed seed gives
    /// the same tree for the same scene.
    pub fn from_scene(scene: &Scene, rng: &mut dyn RngCore) -> Result<Self, BuildError> {
        let root = Self::new(scene.objects(), rng)?;

        log::info!(
            "BVH: {} objects, root bounds {:?}..{:?}, area {:.1}, widest axis {}",
            scene.len(),
            root.bbox.min,
            root.bbox.max,
            root.bbox.surface_area(),
            root.bbox.longest_axis()
        );

        Ok(root)
    }

    /// Build a BVH from a list of objects. The caller's list is left untouched.
    pub fn new(objects: &[Arc<dyn Hittable>], rng: &mut dyn RngCore) -> Result<Self, BuildError> {
        if objects.is_empty() {
            return Err(BuildError::EmptyScene);
        }

        // An unbounded member would break pruning for its whole subtree
        let mut bounded = objects
            .iter()
            .enumerate()
            .map(|(index, object)| {
                object
                    .bounding_box()
                    .map(|bbox| (object.clone(), bbox))
                    .ok_or(BuildError::MissingBoundingBox { index })
            })
            .collect::<Result<Vec<Bounded>, _>>()?;

        Ok(Self::build(&mut bounded, rng))
    }

    /// Recursive construction over a non-empty slice.
    fn build(objects: &mut [Bounded], rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);

        let (left, right, box_left, box_right): (Arc<dyn Hittable>, Arc<dyn Hittable>, Aabb, Aabb) =
            match objects.len() {
                1 => {
                    let (object, bbox) = &objects[0];
                    (object.clone(), object.clone(), *bbox, *bbox)
                }
                2 => {
                    let (a, b) = (&objects[0], &objects[1]);
                    let (first, second) = if a.1.min[axis] < b.1.min[axis] { (a, b) } else { (b, a) };
                    (first.0.clone(), second.0.clone(), first.1, second.1)
                }
                _ => {
                    // Stable sort keeps the tree deterministic for equal keys
                    objects.sort_by(|a, b| a.1.min[axis].total_cmp(&b.1.min[axis]));

                    let mid = objects.len() / 2;
                    let (lower, upper) = objects.split_at_mut(mid);
                    let left = Self::build(lower, rng);
                    let right = Self::build(upper, rng);
                    let (box_left, box_right) = (left.bbox, right.bbox);
                    (Arc::new(left), Arc::new(right), box_left, box_right)
                }
            };

        Self {
            left,
            right,
            bbox: Aabb::surrounding(&box_left, &box_right),
        }
    }

    /// True when both children are the same object (single-member subtree).
    pub fn is_degenerate(&self) -> bool {
        Arc::ptr_eq(&self.left, &self.right)
    }

    pub fn bbox(&self) -> Aabb {
        self.bbox
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.left.hit(ray, ray_t, rec);
        if self.is_degenerate() {
            return hit_left;
        }

        // Only check right up to closest hit
        let right_t = if hit_left { ray_t.with_max(rec.t) } else { ray_t };
        let hit_right = self.right.hit(ray, right_t, rec);

        hit_left || hit_right
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }
}
