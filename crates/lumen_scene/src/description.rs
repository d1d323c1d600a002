//! Serializable scene descriptions.
//!
//! A description is plain data: named materials, spheres that refer to them
//! by name, and an optional camera. [`SceneDescription::build`] validates it
//! and turns it into a renderable [`Scene`].
//!
//! ```json
//! {
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
//!     "glass":  { "type": "dielectric", "refraction_index": 1.5 }
//!   },
//!   "spheres": [
//!     { "center": [0, -100.5, -1], "radius": 100, "material": "ground" },
//!     { "center": [0, 0, -1], "radius": 0.5, "material": "glass" }
//!   ],
//!   "camera": { "image_width": 400, "vfov": 90 }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use lumen_math::Point3;
use lumen_renderer::{CameraConfig, HittableList, Material, Sphere};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::Scene;

/// A sphere as written in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Point3,
    /// Non-zero; negative radii flip the normal for hollow shells
    pub radius: f64,
    /// Key into [`SceneDescription::materials`]
    pub material: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub materials: BTreeMap<String, Material>,
    pub spheres: Vec<SphereDesc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraConfig>,
}

impl SceneDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_material(mut self, name: impl Into<String>, material: Material) -> Self {
        self.materials.insert(name.into(), material);
        self
    }

    pub fn with_sphere(mut self, center: Point3, radius: f64, material: impl Into<String>) -> Self {
        self.spheres.push(SphereDesc {
            center,
            radius,
            material: material.into(),
        });
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Parse a description from JSON text.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON description file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the description and build the scene.
    ///
    /// Spheres naming the same material share one `Arc`. A missing camera
    /// block gives the default camera.
    pub fn build(&self, name: impl Into<String>) -> SceneResult<Scene> {
        if self.spheres.is_empty() {
            return Err(SceneError::Empty);
        }

        let materials: HashMap<&str, Arc<Material>> = self
            .materials
            .iter()
            .map(|(name, material)| (name.as_str(), Arc::new(*material)))
            .collect();

        let mut world = HittableList::new();
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !sphere.center.is_finite() {
                return Err(SceneError::InvalidSphere {
                    index,
                    reason: "center must be finite",
                });
            }
            if !sphere.radius.is_finite() || sphere.radius == 0.0 {
                return Err(SceneError::InvalidSphere {
                    index,
                    reason: "radius must be finite and non-zero",
                });
            }
            let material = materials.get(sphere.material.as_str()).ok_or_else(|| {
                SceneError::UnknownMaterial {
                    sphere: index,
                    material: sphere.material.clone(),
                }
            })?;
            world.add(Sphere::new(sphere.center, sphere.radius, Arc::clone(material)));
        }

        let unused = self
            .materials
            .keys()
            .filter(|name| !self.spheres.iter().any(|s| &s.material == *name))
            .count();
        if unused > 0 {
            log::warn!("{} material(s) not referenced by any sphere", unused);
        }

        Ok(Scene {
            name: name.into(),
            world,
            camera: self.camera.unwrap_or_default(),
        })
    }
}
