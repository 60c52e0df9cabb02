//! Orb - renders a random field of spheres with a path tracer.
//!
//! Usage: `orb [sphere_count] [output_file] [max_depth] [--settings FILE]`

mod settings;

use anyhow::{Context, Result};
use env_logger::Env;
use orb_renderer::{random_scene, render, BvhNode, Camera};
use rand::{rngs::StdRng, SeedableRng};
use settings::{CliArgs, Settings};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse(std::env::args().skip(1));
    let base = match &args.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let settings = args.apply(base);
    let output = args.output_path();

    let mut rng = match settings.scene.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start = Instant::now();
    let scene = random_scene(settings.scene.sphere_count, &mut rng);
    let world = BvhNode::from_scene(&scene, &mut rng).context("Failed to build BVH")?;
    log::info!("Scene with {} objects built in {:?}", scene.len(), start.elapsed());

    let config = &settings.render;
    let camera = Camera::new(&settings.camera, config.aspect_ratio);

    let start = Instant::now();
    let image = render(&camera, &world, config);
    log::info!("Rendered in {:?}", start.elapsed());

    let buffer = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8())
        .context("Pixel buffer does not match image dimensions")?;
    buffer
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Saved to {}", output.display());

    Ok(())
}
