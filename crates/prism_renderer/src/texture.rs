//! Surface textures: solid colors, procedural checkers and noise, images.

use std::path::Path;
use std::sync::Arc;

use prism_core::{Perlin, RtImage};
use prism_math::{Color, Interval, Vec3};
use rand::RngCore;

/// A color lookup over surface coordinates and hit point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checker pattern alternating between two textures in world space.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    /// `scale` is the edge length of one checker cell.
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Texture sampled from a decoded image using (u, v).
///
/// An image without data reads as the decoder's magenta sentinel, so a
/// missing file shows up in the render instead of failing it.
pub struct ImageTexture {
    image: Arc<RtImage>,
}

impl ImageTexture {
    pub fn new(image: Arc<RtImage>) -> Self {
        Self { image }
    }

    /// Decode `path` directly, bypassing any [`prism_core::ImageCache`].
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let image = RtImage::load(path).unwrap_or_else(|err| {
            log::warn!("Could not load image '{}': {}", path.display(), err);
            RtImage::empty()
        });
        Self::new(Arc::new(image))
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Image rows run top to bottom
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f32) as i64;
        let j = (v * self.image.height() as f32) as i64;
        let [r, g, b] = self.image.pixel(i, j);

        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

/// Marble-like grey pattern driven by Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    /// Octaves summed by the turbulence term.
    const TURBULENCE_DEPTH: u32 = 7;

    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turbulence(p, Self::TURBULENCE_DEPTH);
        Color::splat(0.5) * (1.0 + phase.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RED: Color = Color::new(1.0, 0.0, 0.0);
    const BLUE: Color = Color::new(0.0, 0.0, 1.0);

    #[test]
    fn test_solid_color_ignores_inputs() {
        let tex = SolidColor::from_rgb(0.2, 0.4, 0.6);
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(0.2, 0.4, 0.6));
        assert_eq!(tex.value(0.9, 0.1, Vec3::splat(7.0)), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_checker_parity() {
        let tex = CheckerTexture::from_colors(1.0, RED, BLUE);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), RED);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), BLUE);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 1.5, 0.5)), RED);
        // Floor, not truncation, for negative coordinates
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), BLUE);
    }

    #[test]
    fn test_checker_scale() {
        let tex = CheckerTexture::from_colors(2.0, RED, BLUE);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.9, 0.1, 0.1)), RED);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(2.1, 0.1, 0.1)), BLUE);
    }

    #[test]
    fn test_image_texture_missing_is_magenta() {
        let _ = env_logger::builder().is_test(true).try_init();

        let magenta = Color::new(1.0, 0.0, 1.0);
        let tex = ImageTexture::new(Arc::new(RtImage::empty()));
        assert_eq!(tex.value(0.3, 0.7, Vec3::ZERO), magenta);

        let tex = ImageTexture::load("/definitely/not/here/earthmap.jpg");
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), magenta);
    }

    #[test]
    fn test_image_texture_lookup_flips_v() {
        #[rustfmt::skip]
        let data = vec![
            255, 0, 0,    0, 255, 0,
            0, 0, 255,    255, 255, 255,
        ];
        let tex = ImageTexture::new(Arc::new(RtImage::from_rgb(2, 2, data).unwrap()));

        // v = 1 is the top row of the image
        assert_eq!(tex.value(0.0, 1.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.9, 0.9, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(0.1, 0.1, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
        // Out-of-range coordinates clamp to the edge
        assert_eq!(tex.value(5.0, -3.0, Vec3::ZERO), Color::ONE);
    }

    #[test]
    fn test_noise_texture_range() {
        let tex = NoiseTexture::new(4.0, &mut StdRng::seed_from_u64(5));
        for n in 0..100 {
            let c = tex.value(0.0, 0.0, Vec3::splat(n as f32 * 0.31));
            assert!(c.x >= 0.0 && c.x <= 1.0);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }
}
