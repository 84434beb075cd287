//! Progressive multi-threaded renderer.
//!
//! [`Renderer::start_render`] spawns a driving thread that farms buckets out
//! to a rayon pool. Workers write straight into the shared [`FrameBuffer`],
//! so the display can show partial results at any time. The lifecycle is
//! Ready -> Running -> Finished, or Running -> Stopped when cancelled.

use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, render_bucket, RenderJob, DEFAULT_BUCKET_SIZE};
use crate::error::{ConfigError, RenderError};
use crate::frame::{DisplaySink, FrameBuffer, BACKGROUND_PIXEL};
use crate::Scene;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Edge length of a square bucket in pixels
    pub bucket_size: u32,
    /// Worker threads, 0 for one per logical CPU
    pub threads: usize,
    /// Fixed seed for reproducible noise, random when unset
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            bucket_size: DEFAULT_BUCKET_SIZE,
            threads: 0,
            seed: None,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Lifecycle of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderState {
    Ready = 0,
    Running = 1,
    Finished = 2,
    Stopped = 3,
}

impl RenderState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RenderState::Running,
            2 => RenderState::Finished,
            3 => RenderState::Stopped,
            _ => RenderState::Ready,
        }
    }
}

/// State shared between the renderer, its driving thread and the workers.
#[derive(Debug)]
struct SharedState(AtomicU8);

impl SharedState {
    fn new() -> Self {
        Self(AtomicU8::new(RenderState::Ready as u8))
    }

    fn load(&self) -> RenderState {
        RenderState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn store(&self, state: RenderState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move from `current` to `new`, returning false if the state was
    /// something else.
    fn transition(&self, current: RenderState, new: RenderState) -> bool {
        self.0
            .compare_exchange(current as u8, new as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Owns the frame buffer and the background render.
pub struct Renderer {
    config: RenderConfig,
    frame: Arc<FrameBuffer>,
    state: Arc<SharedState>,
    worker: Option<JoinHandle<Duration>>,
    last_render_time: Option<Duration>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            frame: Arc::new(FrameBuffer::new(0, 0, BACKGROUND_PIXEL)),
            state: Arc::new(SharedState::new()),
            worker: None,
            last_render_time: None,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the configuration used by the next render.
    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    /// Begin rendering `scene` at `width` x `height` in the background.
    ///
    /// Returns `Ok(false)` without doing anything if a render is already
    /// running. Otherwise the frame is cleared to the background color, the
    /// scene camera is resized to the frame and the render starts.
    pub fn start_render(
        &mut self,
        scene: &Scene,
        width: u32,
        height: u32,
    ) -> Result<bool, RenderError> {
        if self.state.load() == RenderState::Running {
            log::debug!("Render already running, ignoring start request");
            return Ok(false);
        }
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }

        self.join_worker();

        if self.frame.width() == width && self.frame.height() == height {
            self.frame.fill(BACKGROUND_PIXEL);
        } else {
            self.frame = Arc::new(FrameBuffer::new(width, height, BACKGROUND_PIXEL));
        }

        let mut camera = scene.camera.clone();
        camera.resize(width, height);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .thread_name(|i| format!("prism-worker-{i}"))
            .build()?;

        let buckets = generate_buckets(width, height, self.config.bucket_size);
        let world = scene.world.clone();
        let background = scene.background;
        let config = self.config.clone();
        let frame = self.frame.clone();
        let state = self.state.clone();

        log::info!(
            "Starting render of '{}' at {}x{}: {} spp, depth {}, {} buckets on {} threads",
            scene.name,
            width,
            height,
            config.samples_per_pixel,
            config.max_depth,
            buckets.len(),
            pool.current_num_threads()
        );

        self.state.store(RenderState::Running);

        let spawned = std::thread::Builder::new()
            .name("prism-render".to_string())
            .spawn(move || {
                let start = Instant::now();
                let job = RenderJob {
                    camera: &camera,
                    world: world.as_ref(),
                    background: &background,
                    samples_per_pixel: config.samples_per_pixel,
                    max_depth: config.max_depth,
                };
                let should_stop = || state.load() != RenderState::Running;

                pool.install(|| {
                    buckets.par_iter().for_each(|bucket| {
                        if should_stop() {
                            return;
                        }
                        let mut rng = match config.seed {
                            Some(seed) => {
                                StdRng::seed_from_u64(seed.wrapping_add(bucket.index as u64))
                            }
                            None => StdRng::from_entropy(),
                        };
                        render_bucket(bucket, &job, &frame, &should_stop, &mut rng);
                    });
                });

                let elapsed = start.elapsed();
                if state.transition(RenderState::Running, RenderState::Finished) {
                    log::info!("Render finished in {}", format_duration(elapsed));
                } else {
                    log::info!("Render stopped after {}", format_duration(elapsed));
                }
                elapsed
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(true)
            }
            Err(err) => {
                self.state.store(RenderState::Ready);
                Err(err.into())
            }
        }
    }

    /// Request cooperative cancellation. Workers finish their current pixel
    /// and exit; the frame keeps whatever was rendered so far.
    pub fn stop_render(&mut self) {
        if self.state.transition(RenderState::Running, RenderState::Stopped) {
            log::info!("Stopping render");
        }
    }

    /// Reap the driving thread once the render has finished or stopped.
    ///
    /// Call once per display tick. Never blocks while the render is running.
    pub fn update(&mut self) {
        match self.state.load() {
            RenderState::Finished | RenderState::Stopped => self.join_worker(),
            RenderState::Ready | RenderState::Running => {}
        }
    }

    pub fn state(&self) -> RenderState {
        self.state.load()
    }

    pub fn is_running(&self) -> bool {
        self.state() == RenderState::Running
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Snapshot of the packed RGBA pixels, row-major, top row first.
    pub fn frame(&self) -> Vec<u32> {
        self.frame.snapshot()
    }

    /// Hand the current frame to a display.
    pub fn present(&self, sink: &mut dyn DisplaySink) {
        sink.present(&self.frame.to_rgba_bytes(), self.frame.width(), self.frame.height());
    }

    /// Wall time of the last render that was reaped by [`Renderer::update`].
    pub fn last_render_time(&self) -> Option<Duration> {
        self.last_render_time
    }

    /// The last render time as "Ns Mms", or an empty string before any
    /// render completed.
    pub fn last_render_time_string(&self) -> String {
        self.last_render_time
            .map(format_duration)
            .unwrap_or_default()
    }

    fn join_worker(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };

        match handle.join() {
            Ok(elapsed) => self.last_render_time = Some(elapsed),
            Err(_) => {
                log::error!("Render thread panicked");
                self.state.store(RenderState::Stopped);
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.stop_render();
        self.join_worker();
    }
}

/// Format as "{seconds}s {milliseconds}ms".
pub fn format_duration(duration: Duration) -> String {
    format!("{}s {}ms", duration.as_secs(), duration.subsec_millis())
}
