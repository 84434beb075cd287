//! Prism Core - resources shared by the renderer's textures.
//!
//! This crate provides:
//!
//! - **Image decoding**: [`RtImage`] with clamped pixel lookup and a magenta
//!   sentinel for missing data, plus an [`ImageCache`] keyed by path
//! - **Procedural noise**: [`Perlin`] gradient noise and turbulence

pub mod perlin;
pub mod texture;

// Re-export commonly used types
pub use perlin::Perlin;
pub use texture::{ImageCache, ImageError, ImageResult, RtImage, MISSING_PIXEL};
