//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::{Camera, Color, HitRecord, Hittable, Ray};
use orb_math::{sampling::gen_f32, Interval};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Scattered rays start this far along to avoid re-hitting the surface they left.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Top of the sky gradient; the bottom is white.
pub const SKY_COLOR: Color = Color::new(0.4, 0.4, 0.6);

/// Errors that can end a render early.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("render cancelled after {completed_rows} scanlines")]
    Cancelled { completed_rows: u32 },
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub image_width: u32,
    /// Width over height; the image height is derived from it
    pub aspect_ratio: f32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed; every scanline derives its own generator from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 800,
            aspect_ratio: 4.0 / 3.0,
            samples_per_pixel: 50,
            max_depth: 60,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Image height derived from width and aspect ratio (at least one row).
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f32 / self.aspect_ratio).round() as u32).max(1)
    }

    /// Replace unusable values with defaults. Never fails.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.image_width == 0 {
            log::warn!("image_width must be positive, using {}", defaults.image_width);
            self.image_width = defaults.image_width;
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            log::warn!(
                "aspect_ratio {} is invalid, using {}",
                self.aspect_ratio,
                defaults.aspect_ratio
            );
            self.aspect_ratio = defaults.aspect_ratio;
        }
        if self.samples_per_pixel == 0 {
            log::warn!(
                "samples_per_pixel must be positive, using {}",
                defaults.samples_per_pixel
            );
            self.samples_per_pixel = defaults.samples_per_pixel;
        }
        if self.max_depth == 0 {
            log::warn!("max_depth must be positive, using {}", defaults.max_depth);
            self.max_depth = defaults.max_depth;
        }

        self
    }

    /// Independent generator for one scanline.
    pub fn row_rng(&self, row: u32) -> StdRng {
        StdRng::seed_from_u64(
            self.seed
                .wrapping_mul(0x9E37_79B9_7F4A_7C15)
                .wrapping_add(u64::from(row)),
        )
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(ray, Interval::from_min(SHADOW_ACNE_EPSILON), &mut rec) {
        return sky_color(ray);
    }

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        // Absorbed
        None => Color::ZERO,
    }
}

/// Background gradient from white (looking down) to [`SKY_COLOR`] (looking up).
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * Color::ONE + a * SKY_COLOR
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize one averaged linear channel to 8 bits.
#[inline]
fn quantize(linear: f32) -> u8 {
    // NaN from a corrupted sample becomes black rather than poisoning output
    let linear = if linear.is_nan() { 0.0 } else { linear };
    let intensity = Interval::new(0.0, 0.999);
    (256.0 * intensity.clamp(linear_to_gamma(linear))) as u8
}

/// Convert an averaged linear color to 8-bit RGB.
///
/// The blue byte carries the blue channel.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// `x` counts columns from the left and `y` rows from the top. A `y` past the
/// last row is clamped to it.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width = config.image_width;
    let height = config.image_height();
    // Screen t grows upwards
    let j = height - 1 - y.min(height - 1);
    let s_scale = 1.0 / (width.max(2) - 1) as f32;
    let t_scale = 1.0 / (height.max(2) - 1) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) * s_scale;
        let t = (j as f32 + gen_f32(rng)) * t_scale;

        let ray = camera.emit_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Simple image buffer holding averaged linear colors, row 0 at the top.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Quantized RGB bytes in row-major order (for saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgb(*color))
            .collect()
    }
}

/// Render the entire scene to an image buffer.
///
/// This is a simple single-threaded renderer.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let never = AtomicBool::new(false);
    match render_with_cancel(camera, world, config, &never) {
        Ok(image) => image,
        Err(RenderError::Cancelled { .. }) => unreachable!("cancel flag is never set"),
    }
}

/// Render the entire scene, polling `cancel` between scanlines.
pub fn render_with_cancel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> Result<ImageBuffer, RenderError> {
    let width = config.image_width;
    let height = config.image_height();
    let mut image = ImageBuffer::new(width, height);

    log::info!(
        "Rendering {}x{} @ {} spp, depth {}",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth
    );

    for y in 0..height {
        if cancel.load(Ordering::Relaxed) {
            log::warn!("Render cancelled at scanline {}/{}", y, height);
            return Err(RenderError::Cancelled { completed_rows: y });
        }

        let mut rng = config.row_rng(y);
        for x in 0..width {
            let color = render_pixel(camera, world, x, y, config, &mut rng);
            image.set(x, y, color);
        }

        log::debug!("Scanline {} done, {} remaining", y, height - 1 - y);
    }

    log::info!("Render finished");
    Ok(image)
}
