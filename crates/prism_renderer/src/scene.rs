//! A renderable scene: world geometry, camera and background.

use std::fmt;
use std::sync::Arc;

use prism_math::{Color, Ray};

use crate::{Camera, Hittable};

/// Radiance for rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Constant color in every direction
    Solid(Color),
    /// White at the horizon blending to light blue overhead
    SkyGradient,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => sky_gradient(ray),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Everything the renderer needs for one image.
///
/// The world is shared, so cloning a scene is cheap.
#[derive(Clone)]
pub struct Scene {
    pub name: String,
    pub world: Arc<dyn Hittable>,
    pub camera: Camera,
    pub background: Background,
}

impl Scene {
    pub fn new(
        name: impl Into<String>,
        world: Arc<dyn Hittable>,
        camera: Camera,
        background: Background,
    ) -> Self {
        Self {
            name: name.into(),
            world,
            camera,
            background,
        }
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("bounds", &self.world.bounding_box())
            .field("camera", &self.camera)
            .field("background", &self.background)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_math::Vec3;

    #[test]
    fn test_sky_gradient() {
        let up = Background::SkyGradient.color(&Ray::new_simple(Vec3::ZERO, Vec3::Y));
        let down = Background::SkyGradient.color(&Ray::new_simple(Vec3::ZERO, Vec3::NEG_Y));

        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
        assert!((down - Color::ONE).length() < 1e-6);
    }

    #[test]
    fn test_solid_background_ignores_direction() {
        let bg = Background::Solid(Color::new(0.7, 0.8, 1.0));
        assert_eq!(bg.color(&Ray::new_simple(Vec3::ZERO, Vec3::X)), Color::new(0.7, 0.8, 1.0));
        assert_eq!(Background::default().color(&Ray::default()), Color::ZERO);
    }
}
