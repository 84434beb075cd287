//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Emission from lights
//! - Gamma correction and 8-bit packing of the averaged sample

use prism_math::{Color, Interval, Ray};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::scene::Background;
use crate::Camera;

/// Hits closer than this are ignored to avoid self-intersection acne.
pub const RAY_EPSILON: f32 = 0.001;

/// Compute the color seen by a ray.
///
/// Follows the ray through the scene for at most `depth` bounces, summing
/// emission and attenuated scattered light.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::new(RAY_EPSILON, f32::INFINITY), &mut rec, rng) {
        return background.color(ray);
    }

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Average `samples` jittered paths through pixel (x, y).
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    samples: u32,
    max_depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = samples.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, max_depth, background, rng);
    }

    pixel_color / samples as f32
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

/// Convert a linear color to 8-bit RGBA.
///
/// NaN components map to 0.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let intensity = Interval::new(0.0, 1.0);
    let to_byte = |c: f32| (255.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}
