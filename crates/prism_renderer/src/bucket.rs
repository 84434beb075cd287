//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use crate::frame::FrameBuffer;
use crate::integrator::{color_to_rgba, render_pixel};
use crate::scene::Background;
use crate::{Camera, Hittable};
use rand::RngCore;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Everything a worker needs to shade pixels, borrowed for one frame.
pub struct RenderJob<'a> {
    pub camera: &'a Camera,
    pub world: &'a dyn Hittable,
    pub background: &'a Background,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
}

/// Generate buckets covering a `width` x `height` image, sorted in spiral
/// order from the center outward.
///
/// Edge buckets are clipped to the image. A bucket size of 0 is treated as 1.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Indices follow render order
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance of their centers from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable, so ties keep row-major order
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Render a single bucket straight into `frame`.
///
/// `should_stop` is polled before every pixel. Returns false if the bucket
/// was abandoned part way.
pub fn render_bucket(
    bucket: &Bucket,
    job: &RenderJob,
    frame: &FrameBuffer,
    should_stop: &dyn Fn() -> bool,
    rng: &mut dyn RngCore,
) -> bool {
    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            if should_stop() {
                return false;
            }

            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            let color = render_pixel(
                job.camera,
                job.world,
                x,
                y,
                job.samples_per_pixel,
                job.max_depth,
                job.background,
                rng,
            );
            frame.set(x, y, color_to_rgba(color));
        }
    }

    true
}
