//! Simple path tracer example.
//!
//! Renders one of the built-in scenes and saves it as a PNG.
//!
//! ```text
//! cargo run --release --example simple_render -- "Cornell Box" cornell.png [config.json]
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use prism_core::ImageCache;
use prism_renderer::scenes::{build_scene, SCENES};
use prism_renderer::{DisplaySink, RenderConfig, RenderState, Renderer};
use rand::rngs::StdRng;
use rand::SeedableRng;

const WIDTH: u32 = 600;
const HEIGHT: u32 = 600;

/// Writes presented frames to a PNG file.
struct PngSink {
    path: PathBuf,
    result: Result<()>,
}

impl DisplaySink for PngSink {
    fn present(&mut self, rgba: &[u8], width: u32, height: u32) {
        self.result = image::save_buffer(&self.path, rgba, width, height, image::ColorType::Rgba8)
            .with_context(|| format!("Failed to write {}", self.path.display()));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let scene_name = args.next().unwrap_or_else(|| "Cornell Box".to_string());
    let output = PathBuf::from(args.next().unwrap_or_else(|| "output.png".to_string()));
    let config = match args.next() {
        Some(path) => RenderConfig::from_json_file(&path)
            .with_context(|| format!("Failed to read render config {}", path))?,
        None => RenderConfig {
            samples_per_pixel: 50,
            max_depth: 10,
            ..RenderConfig::default()
        },
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut images = ImageCache::with_base_dir("assets");

    let scene = build_scene(&scene_name, WIDTH, HEIGHT, &mut rng, &mut images)
        .ok_or_else(|| {
            let known: Vec<_> = SCENES.iter().map(|(name, _)| *name).collect();
            anyhow!("Unknown scene '{}', expected one of {:?}", scene_name, known)
        })??;

    log::info!(
        "Rendering '{}' at {}x{} with {} spp",
        scene.name,
        WIDTH,
        HEIGHT,
        config.samples_per_pixel
    );

    let mut renderer = Renderer::new(config);
    renderer.start_render(&scene, WIDTH, HEIGHT)?;

    while renderer.is_running() {
        thread::sleep(Duration::from_millis(100));
    }
    renderer.update();

    if renderer.state() != RenderState::Finished {
        return Err(anyhow!("Render ended in state {:?}", renderer.state()));
    }
    log::info!("Rendered in {}", renderer.last_render_time_string());

    let mut sink = PngSink {
        path: output,
        result: Ok(()),
    };
    renderer.present(&mut sink);
    sink.result?;
    log::info!("Saved to {}", sink.path.display());

    Ok(())
}
