//! Lumen Scene - scene descriptions and built-in scenes.
//!
//! This crate provides:
//!
//! - **Scene descriptions**: serde-friendly [`SceneDescription`] values,
//!   loadable from JSON
//! - **Built-in scenes**: `three_spheres`, `cover` and `ground`
//!
//! # Example
//!
//! ```ignore
//! use lumen_scene::load;
//!
//! let scene = load("three_spheres", 0)?;
//! println!("Loaded '{}' with {} spheres", scene.name, scene.world.len());
//! ```

pub mod builtin;
pub mod description;
mod error;

use std::path::Path;

use lumen_renderer::{CameraConfig, HittableList};

pub use builtin::BUILTIN_SCENES;
pub use description::{SceneDescription, SphereDesc};
pub use error::{SceneError, SceneResult};

/// A renderable scene: the geometry plus the camera it was described with.
pub struct Scene {
    pub name: String,
    pub world: HittableList,
    pub camera: CameraConfig,
}

/// Description of a built-in scene by name.
///
/// `seed` only affects scenes with a random layout (`cover`).
pub fn builtin_description(name: &str, seed: u64) -> SceneResult<SceneDescription> {
    match name {
        "three_spheres" => Ok(builtin::three_spheres()),
        "cover" => Ok(builtin::cover(seed)),
        "ground" => Ok(builtin::ground()),
        other => Err(SceneError::UnknownScene(other.to_string())),
    }
}

/// Build a built-in scene by name.
pub fn builtin(name: &str, seed: u64) -> SceneResult<Scene> {
    builtin_description(name, seed)?.build(name)
}

/// Load and build a JSON scene file.
pub fn load_file<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let scene = SceneDescription::from_file(path)?.build(name)?;
    log::info!(
        "Loaded scene '{}' from {} ({} spheres)",
        scene.name,
        path.display(),
        scene.world.len()
    );
    Ok(scene)
}

/// Resolve a built-in scene name or, failing that, a JSON file path.
pub fn load(name_or_path: &str, seed: u64) -> SceneResult<Scene> {
    if BUILTIN_SCENES.contains(&name_or_path) {
        let scene = builtin(name_or_path, seed)?;
        log::info!(
            "Built scene '{}' ({} spheres)",
            scene.name,
            scene.world.len()
        );
        return Ok(scene);
    }
    load_file(name_or_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::{render, Camera, RenderOptions};

    #[test]
    fn test_builtin_names_resolve() {
        for &name in BUILTIN_SCENES {
            let scene = builtin(name, 1).unwrap();
            assert_eq!(scene.name, name);
            assert!(!scene.world.is_empty());
        }
    }

    #[test]
    fn test_unknown_builtin() {
        let err = builtin("teapot", 0).err().unwrap();
        assert!(matches!(err, SceneError::UnknownScene(ref name) if name == "teapot"));
        assert!(err.to_string().contains("three_spheres"));
    }

    #[test]
    fn test_load_falls_back_to_file() {
        assert!(matches!(
            load("/nonexistent/scene.json", 0),
            Err(SceneError::Io(_))
        ));
    }

    #[test]
    fn test_builtin_scene_renders() {
        let scene = builtin("three_spheres", 0).unwrap();
        let config = scene.camera.with_image(16.0 / 9.0, 32).with_quality(2, 5);
        let camera = Camera::initialize(config).unwrap();

        let image = render(&camera, &scene.world, &RenderOptions::new().with_seed(11)).unwrap();
        assert_eq!((image.width, image.height), (32, 18));
        assert!(image.pixels.iter().all(|c| c.is_finite()));
    }
}
