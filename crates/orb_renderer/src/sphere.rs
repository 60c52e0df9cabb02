//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use orb_math::{Aabb, Interval, Ray, Vec3};
use std::sync::Arc;

/// A sphere primitive.
///
/// The material is shared: many spheres may point at the same instance.
#[derive(Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Degenerate radii are accepted as-is and resolve through float semantics.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        // Half-b form of |O + tD - C|^2 = r^2
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant <= 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius);
        Some(Aabb::from_points(self.center - rvec, self.center + rvec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    fn grey_sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::solid(Vec3::new(0.5, 0.5, 0.5))),
        )
    }

    #[test]
    fn test_sphere_hit_near_side() {
        let sphere = grey_sphere(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, 100.0), &mut rec));
        assert_eq!(rec.t, 4.0);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(rec.normal, Vec3::Z);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_hit_far_side_from_inside() {
        let sphere = grey_sphere(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::from_min(0.001), &mut rec));
        assert_eq!(rec.t, 1.0);
        assert!(!rec.front_face);
        // Normal flipped to face the ray
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_sphere_hit_falls_back_to_far_root() {
        let sphere = grey_sphere(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        // Near root t=4 excluded by the interval
        assert!(sphere.hit(&ray, Interval::new(4.5, 100.0), &mut rec));
        assert_eq!(rec.t, 6.0);
    }

    #[test]
    fn test_sphere_hit_unnormalized_direction() {
        let sphere = grey_sphere(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::from_min(0.001), &mut rec));
        assert_eq!(rec.t, 2.0);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = grey_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&ray, Interval::from_min(0.001), &mut rec));
        assert_eq!(rec.t, 0.0);
    }

    #[test]
    fn test_sphere_tangent_ray_misses() {
        let sphere = grey_sphere(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(1.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&ray, Interval::from_min(0.001), &mut rec));
    }

    #[test]
    fn test_sphere_bounding_box() {
        let sphere = grey_sphere(Vec3::new(1.0, 2.0, 3.0), 0.5);
        let bbox = sphere.bounding_box().unwrap();

        assert_eq!(bbox.min, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(bbox.max, Vec3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn test_sphere_shares_material() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::solid(Vec3::ONE));
        let a = Sphere::new(Vec3::ZERO, 1.0, material.clone());
        let b = Sphere::new(Vec3::X * 5.0, 1.0, material.clone());

        assert!(Arc::ptr_eq(&a.material, &b.material));
        assert_eq!(Arc::strong_count(&material), 3);
    }
}
