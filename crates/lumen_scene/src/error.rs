use thiserror::Error;

/// Errors that can occur while building or loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sphere {sphere} references unknown material '{material}'")]
    UnknownMaterial { sphere: usize, material: String },

    #[error("sphere {index} is invalid: {reason}")]
    InvalidSphere { index: usize, reason: &'static str },

    #[error("scene contains no spheres")]
    Empty,

    #[error("unknown built-in scene '{0}' (expected one of: {names})", names = crate::BUILTIN_SCENES.join(", "))]
    UnknownScene(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
