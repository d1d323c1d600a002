//! Errors reported before or around a render.
//!
//! Nothing inside the per-pixel path can fail: misses and absorption are
//! ordinary `None`s. What can go wrong is a camera that cannot form a
//! viewport, a cancelled render, or the output sink.

use thiserror::Error;

/// Invalid camera configuration, detected by `Camera::initialize`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f64),

    #[error("image width must be at least one pixel")]
    ZeroImageWidth,

    #[error("image of {width}x{height} pixels exceeds the pixel budget")]
    ImageTooLarge { width: u32, height: f64 },

    #[error("samples per pixel must be at least one")]
    ZeroSamples,

    #[error("max depth must be at least one bounce")]
    ZeroMaxDepth,

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f64),

    #[error("{0} must be finite")]
    NonFiniteVector(&'static str),

    #[error("look_from and look_at coincide, the view direction is undefined")]
    DegenerateViewDirection,

    #[error("view_up is parallel to the view direction")]
    ViewUpParallel,

    #[error("defocus angle must be in [0, 180) degrees, got {0}")]
    InvalidDefocusAngle(f64),

    #[error("focus distance must be positive and finite, got {0}")]
    InvalidFocusDistance(f64),
}

/// Errors that can occur while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid camera configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("render cancelled")]
    Cancelled,

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
