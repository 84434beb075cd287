//! Prism Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer with spheres, quads, boxes, participating
//! media, instancing transforms and a BVH, rendered tile by tile on a
//! rayon thread pool while a display reads the shared frame buffer.

mod bucket;
mod bvh;
mod camera;
mod error;
mod frame;
mod hittable;
mod integrator;
mod material;
mod medium;
mod quad;
mod renderer;
pub mod sampling;
mod scene;
pub mod scenes;
mod sphere;
mod texture;
mod transform;

pub use bucket::{generate_buckets, render_bucket, Bucket, RenderJob, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{BuildError, BuildResult, ConfigError, RenderError};
pub use frame::{pack_rgba, unpack_rgba, DisplaySink, FrameBuffer, BACKGROUND_PIXEL};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{color_to_rgba, linear_to_gamma, ray_color, render_pixel, RAY_EPSILON};
pub use material::{
    reflect, refract, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    ScatterResult,
};
pub use medium::ConstantMedium;
pub use quad::{make_box, Quad};
pub use renderer::{format_duration, RenderConfig, RenderState, Renderer};
pub use scene::{Background, Scene};
pub use scenes::SceneList;
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use transform::{RotateY, Translate};

/// Re-export Vec3 and common math types from prism_math
pub use prism_math::{Aabb, Color, Interval, Ray, Vec3};
