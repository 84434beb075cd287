//! Texture image loading and caching.
//!
//! Images are decoded with the `image` crate, converted from sRGB to linear
//! and stored as 8-bit RGB so that lookups stay cheap during rendering.
//! An image that fails to load is represented by [`RtImage::empty`], whose
//! pixels read back as magenta.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Bytes per stored pixel (RGB).
const BYTES_PER_PIXEL: usize = 3;

/// Returned for every lookup into an image without data.
pub const MISSING_PIXEL: [u8; 3] = [255, 0, 255];

/// Errors that can occur during image loading.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Pixel data does not match {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A decoded RGB image with clamped pixel lookup.
#[derive(Clone, Debug, Default)]
pub struct RtImage {
    width: u32,
    height: u32,
    /// Row-major RGB bytes, empty when no image is loaded
    data: Vec<u8>,
}

impl RtImage {
    /// An image with no data. Every pixel reads as [`MISSING_PIXEL`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an image from raw row-major RGB bytes (already linear).
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> ImageResult<Self> {
        if data.len() != width as usize * height as usize * BYTES_PER_PIXEL {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decode an image file, converting sRGB to linear.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let rgb = image::open(path.as_ref())?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let data = rgb
            .into_raw()
            .into_iter()
            .map(|byte| float_to_byte(srgb_to_linear(byte)))
            .collect();

        Self::from_rgb(width, height, data)
    }

    /// Width in pixels, 0 without data.
    pub fn width(&self) -> u32 {
        if self.data.is_empty() {
            0
        } else {
            self.width
        }
    }

    /// Height in pixels, 0 without data.
    pub fn height(&self) -> u32 {
        if self.data.is_empty() {
            0
        } else {
            self.height
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// RGB bytes at (x, y). Coordinates are clamped into the image.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 3] {
        if self.data.is_empty() {
            return MISSING_PIXEL;
        }

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;

        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// Cache for loaded images.
///
/// Images are loaded on demand and shared between textures. A file that
/// cannot be decoded is cached as the empty image so the failure is logged
/// once and the render continues with the magenta sentinel.
pub struct ImageCache {
    images: HashMap<String, Arc<RtImage>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create an image cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image from file, using the cache if available.
    ///
    /// Never fails: decoding errors are logged and produce the empty image.
    pub fn load(&mut self, path: &str) -> Arc<RtImage> {
        if let Some(image) = self.images.get(path) {
            log::debug!("Image cache hit: {}", path);
            return image.clone();
        }

        let full_path = self.resolve_path(path);
        let image = match RtImage::load(&full_path) {
            Ok(image) => {
                log::debug!(
                    "Loaded image: {} ({}x{})",
                    full_path.display(),
                    image.width(),
                    image.height()
                );
                image
            }
            Err(err) => {
                log::warn!("Could not load image '{}': {}", full_path.display(), err);
                RtImage::empty()
            }
        };

        let image = Arc::new(image);
        self.images.insert(path.to_string(), image.clone());
        image
    }

    /// Get a cached image without loading.
    pub fn get(&self, path: &str) -> Option<Arc<RtImage>> {
        self.images.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Quantize a [0, 1] float back to a byte.
fn float_to_byte(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        255
    } else {
        (256.0 * value) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_2x2() -> RtImage {
        #[rustfmt::skip]
        let data = vec![
            10, 20, 30,    40, 50, 60,
            70, 80, 90,    100, 110, 120,
        ];
        RtImage::from_rgb(2, 2, data).unwrap()
    }

    #[test]
    fn test_empty_image_returns_magenta() {
        let image = RtImage::empty();
        assert_eq!(image.width(), 0);
        assert_eq!(image.height(), 0);
        assert_eq!(image.pixel(0, 0), MISSING_PIXEL);
        assert_eq!(image.pixel(-4, 99), [255, 0, 255]);
    }

    #[test]
    fn test_pixel_lookup() {
        let image = checker_2x2();
        assert_eq!(image.pixel(0, 0), [10, 20, 30]);
        assert_eq!(image.pixel(1, 0), [40, 50, 60]);
        assert_eq!(image.pixel(0, 1), [70, 80, 90]);
        assert_eq!(image.pixel(1, 1), [100, 110, 120]);
    }

    #[test]
    fn test_pixel_lookup_clamps() {
        let image = checker_2x2();
        assert_eq!(image.pixel(-5, -5), [10, 20, 30]);
        assert_eq!(image.pixel(2, 0), [40, 50, 60]);
        assert_eq!(image.pixel(7, 9), [100, 110, 120]);
    }

    #[test]
    fn test_from_rgb_rejects_wrong_length() {
        let err = RtImage::from_rgb(2, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(err, ImageError::InvalidDimensions { width: 2, height: 2 }));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        assert!(RtImage::load("/definitely/not/here.png").is_err());
    }

    #[test]
    fn test_cache_degrades_missing_image() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut cache = ImageCache::with_base_dir("/definitely/not/here");
        assert!(cache.is_empty());

        let image = cache.load("earthmap.jpg");
        assert!(image.is_empty());
        assert_eq!(image.pixel(3, 3), MISSING_PIXEL);

        // Second lookup is served from the cache
        let again = cache.load("earthmap.jpg");
        assert!(Arc::ptr_eq(&image, &again));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("earthmap.jpg").is_some());
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }

    #[test]
    fn test_float_to_byte() {
        assert_eq!(float_to_byte(-1.0), 0);
        assert_eq!(float_to_byte(0.5), 128);
        assert_eq!(float_to_byte(1.0), 255);
        assert_eq!(float_to_byte(7.0), 255);
    }
}
