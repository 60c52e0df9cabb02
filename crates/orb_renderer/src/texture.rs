//! Procedural textures sampled by materials.
//!
//! Textures are evaluated at the hit point in object space, so `(u, v)` is
//! accepted for interface symmetry but neither variant here needs it.

use crate::Color;
use orb_math::Vec3;
use std::sync::Arc;

/// Frequency of the checker pattern along each axis.
pub const CHECKER_FREQUENCY: f32 = 10.0;

/// Something that yields a colour for a surface point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A texture with a constant uniform color
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checker pattern delegating to two child textures.
///
/// The sign of `sin(kx) * sin(ky) * sin(kz)` picks the child: `odd` when
/// negative, `even` otherwise.
pub struct Checker {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
    frequency: f32,
}

impl Checker {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self::with_frequency(even, odd, CHECKER_FREQUENCY)
    }

    pub fn with_frequency(even: Arc<dyn Texture>, odd: Arc<dyn Texture>, frequency: f32) -> Self {
        Self {
            even,
            odd,
            frequency,
        }
    }

    /// Checker between two constant colours.
    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }
}

impl Texture for Checker {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let k = self.frequency;
        let sign = (k * p.x).sin() * (k * p.y).sin() * (k * p.z).sin();

        if sign < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const RED: Color = Color::new(1.0, 0.0, 0.0);
    const BLUE: Color = Color::new(0.0, 0.0, 1.0);

    #[test]
    fn test_solid_ignores_inputs() {
        let solid = SolidColor::rgb(0.2, 0.4, 0.6);

        assert_eq!(solid.value(0.0, 0.0, Vec3::ZERO), Color::new(0.2, 0.4, 0.6));
        assert_eq!(
            solid.value(0.7, 0.1, Vec3::new(-3.0, 8.0, 1.0)),
            Color::new(0.2, 0.4, 0.6)
        );
    }

    #[test]
    fn test_checker_alternates_on_half_period_shift() {
        let checker = Checker::from_colors(RED, BLUE);
        let half_period = PI / CHECKER_FREQUENCY;

        let p = Vec3::splat(0.05);
        let shifted = p + Vec3::new(half_period, 0.0, 0.0);

        assert_eq!(checker.value(0.0, 0.0, p), RED);
        assert_eq!(checker.value(0.0, 0.0, shifted), BLUE);
    }

    #[test]
    fn test_checker_alternates_on_every_axis() {
        let checker = Checker::from_colors(RED, BLUE);
        let half_period = PI / CHECKER_FREQUENCY;
        let p = Vec3::new(0.05, 0.12, 0.03);

        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let a = checker.value(0.0, 0.0, p);
            let b = checker.value(0.0, 0.0, p + axis * half_period);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_checker_delegates_to_child_textures() {
        let inner = Arc::new(Checker::from_colors(RED, BLUE));
        let outer = Checker::new(inner, Arc::new(SolidColor::new(Color::ONE)));

        // Positive octant near the origin is "even" for both levels
        assert_eq!(outer.value(0.0, 0.0, Vec3::splat(0.05)), RED);
    }
}
