//! Flat object collections and the random demo scene.

use crate::{
    Checker, Color, Dielectric, HitRecord, Hittable, Lambertian, Material, Metal, SolidColor,
    Sphere,
};
use orb_math::{
    sampling::{gen_f32, gen_f32_in, random_vec3, random_vec3_in},
    Aabb, Interval, Ray, Vec3,
};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// An ordered collection of hittable objects.
///
/// Intersection is a linear scan, which makes this the reference the BVH must
/// agree with. Order only matters for how a BVH built from it comes out.
#[derive(Clone, Default)]
pub struct Scene {
    objects: Vec<Arc<dyn Hittable>>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// The member objects, in insertion order.
    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl From<Vec<Arc<dyn Hittable>>> for Scene {
    fn from(objects: Vec<Arc<dyn Hittable>>) -> Self {
        Self { objects }
    }
}

impl Hittable for Scene {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let mut objects = self.objects.iter();
        let first = objects.next()?.bounding_box()?;

        objects.try_fold(first, |acc, object| {
            object
                .bounding_box()
                .map(|bbox| Aabb::surrounding(&acc, &bbox))
        })
    }
}

/// Build the demo scene: a checkered ground sphere plus `sphere_count` small
/// spheres of random size and material laid out on a grid.
pub fn random_scene(sphere_count: usize, rng: &mut dyn RngCore) -> Scene {
    let mut scene = Scene::new();

    let ground: Arc<dyn Material> =
        Arc::new(Lambertian::new(Arc::new(Checker::from_colors(Color::ONE, Color::ONE))));
    scene.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    let (columns, rows) = grid_layout(sphere_count);
    for i in 0..columns {
        for j in 0..rows {
            let center = Vec3::new(
                i as f32 + gen_f32(rng),
                gen_f32_in(rng, 0.1, 0.8),
                j as f32 + gen_f32(rng),
            );
            scene.add(Arc::new(random_sphere(center, rng)));
        }
    }

    log::debug!(
        "random scene: {} objects on a {}x{} grid",
        scene.len(),
        columns,
        rows
    );
    scene
}

/// Columns double and rows halve until rows drop below columns.
fn grid_layout(sphere_count: usize) -> (usize, usize) {
    let mut columns = 1;
    let mut rows = sphere_count;
    while rows >= columns {
        columns *= 2;
        rows /= 2;
    }
    (columns, rows + 1)
}

fn random_sphere(center: Vec3, rng: &mut dyn RngCore) -> Sphere {
    let radius = gen_f32_in(rng, 0.16, 0.26);

    let material: Arc<dyn Material> = match rng.gen_range(0..3) {
        0 => {
            let checker = Checker::new(
                Arc::new(SolidColor::new(random_vec3(rng))),
                Arc::new(SolidColor::new(random_vec3(rng))),
            );
            Arc::new(Lambertian::new(Arc::new(checker)))
        }
        1 => {
            let albedo = random_vec3_in(rng, 0.5, 1.0);
            Arc::new(Metal::new(albedo, gen_f32_in(rng, 0.2, 0.5)))
        }
        _ => Arc::new(Dielectric::new(1.5)),
    };

    Sphere::new(center, radius, material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere_at(center: Vec3, radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::solid(Color::splat(0.5))),
        ))
    }

    #[test]
    fn test_scene_returns_closest_hit() {
        let mut scene = Scene::new();
        // Far sphere first so the scan has to shrink its interval
        scene.add(sphere_at(Vec3::new(0.0, 0.0, -10.0), 1.0));
        scene.add(sphere_at(Vec3::new(0.0, 0.0, -3.0), 1.0));
        scene.add(sphere_at(Vec3::new(0.0, 0.0, -6.0), 1.0));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(scene.hit(&ray, Interval::from_min(0.001), &mut rec));
        assert_eq!(rec.t, 2.0);
    }

    #[test]
    fn test_scene_miss() {
        let scene = Scene::from(vec![sphere_at(Vec3::new(0.0, 0.0, -3.0), 1.0)]);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let mut rec = HitRecord::default();

        assert!(!scene.hit(&ray, Interval::from_min(0.001), &mut rec));
    }

    #[test]
    fn test_scene_bounding_box_is_union() {
        let scene = Scene::from(vec![
            sphere_at(Vec3::new(-2.0, 0.0, 0.0), 1.0),
            sphere_at(Vec3::new(3.0, 1.0, 0.0), 0.5),
        ]);

        let bbox = scene.bounding_box().unwrap();
        assert_eq!(bbox.min, Vec3::new(-3.0, -1.0, -1.0));
        assert_eq!(bbox.max, Vec3::new(3.5, 1.5, 1.0));
    }

    #[test]
    fn test_empty_scene_has_no_bounding_box() {
        assert!(Scene::new().bounding_box().is_none());
    }

    #[test]
    fn test_grid_layout() {
        assert_eq!(grid_layout(20), (8, 3));
        assert_eq!(grid_layout(0), (1, 1));
        assert_eq!(grid_layout(1), (2, 1));
    }

    #[test]
    fn test_random_scene_population() {
        let mut rng = StdRng::seed_from_u64(42);
        let scene = random_scene(20, &mut rng);

        let (columns, rows) = grid_layout(20);
        assert_eq!(scene.len(), 1 + columns * rows);
        assert!(scene.bounding_box().is_some());
    }

    #[test]
    fn test_random_scene_is_seeded() {
        let a = random_scene(10, &mut StdRng::seed_from_u64(3));
        let b = random_scene(10, &mut StdRng::seed_from_u64(3));

        assert_eq!(a.bounding_box(), b.bounding_box());
    }
}
