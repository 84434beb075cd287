//! Error types for scene construction, rendering and configuration.

use thiserror::Error;

/// Errors raised while assembling scene geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Cannot build a BVH from an empty object list")]
    EmptyBvh,

    #[error("Participating medium density must be positive and finite, got {0}")]
    InvalidDensity(f32),
}

/// Errors raised when starting a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Scene build error: {0}")]
    Build(#[from] BuildError),
}

/// Errors raised while loading a [`RenderConfig`](crate::RenderConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type BuildResult<T> = Result<T, BuildError>;
