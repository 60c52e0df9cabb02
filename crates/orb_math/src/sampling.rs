//! Random sampling constructors for [`Vec3`].
//!
//! All samplers draw from an explicitly passed generator; there is no shared
//! global random state.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Uniform draw in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform draw in `[min, max)`.
#[inline]
pub fn gen_f32_in(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Uniform point in `[0, 1)^3`.
pub fn random_vec3(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
}

/// Uniform point in the box `[min, max)^3`.
pub fn random_vec3_in(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        gen_f32_in(rng, min, max),
        gen_f32_in(rng, min, max),
        gen_f32_in(rng, min, max),
    )
}

/// Uniform point in the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32_in(rng, -1.0, 1.0), gen_f32_in(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform point inside the unit ball.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec3_in(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform point on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling, then project onto the surface
    loop {
        let p = random_vec3_in(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}
