// Re-export glam for convenience
pub use glam::*;

// Prism math types
mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::TransformAabb;

/// RGB color in linear space, components nominally in [0, 1].
pub type Color = Vec3;
