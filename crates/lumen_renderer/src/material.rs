//! Surface materials and how they scatter light.

use crate::hittable::HitRecord;
use lumen_math::random::{random_f64, random_unit_vector};
use lumen_math::{reflect, refract, Color, Ray, Vec3Ext};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Outcome of a ray that was not absorbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel fraction of the outgoing radiance that survives
    pub attenuation: Color,
    /// The ray leaving the surface
    pub scattered: Ray,
}

/// Material bound to a primitive.
///
/// The set of materials is closed, so scatter dispatches with a `match`
/// instead of a trait object. Materials are shared between primitives
/// through `Arc` and are never mutated while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", from = "MaterialDesc")]
pub enum Material {
    /// Ideal diffuse surface.
    Lambertian { albedo: Color },
    /// Specular reflector. `fuzz` is the roughness radius in [0, 1]; build
    /// through [`Material::metal`] or deserialization, which both clamp it.
    Metal { albedo: Color, fuzz: f64 },
    /// Clear refractive material such as glass (1.5) or water (1.33).
    Dielectric { refraction_index: f64 },
}

/// Wire form of [`Material`]; deserialized values go through the
/// constructors so they get the same normalization.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MaterialDesc {
    Lambertian { albedo: Color },
    Metal { albedo: Color, fuzz: f64 },
    Dielectric { refraction_index: f64 },
}

impl From<MaterialDesc> for Material {
    fn from(desc: MaterialDesc) -> Self {
        match desc {
            MaterialDesc::Lambertian { albedo } => Material::lambertian(albedo),
            MaterialDesc::Metal { albedo, fuzz } => Material::metal(albedo, fuzz),
            MaterialDesc::Dielectric { refraction_index } => Material::dielectric(refraction_index),
        }
    }
}

impl Material {
    /// Create a Lambertian (diffuse) material with the given albedo color.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Create a Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal {
            albedo,
            fuzz: clamp_fuzz(fuzz),
        }
    }

    /// Create a Dielectric material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn dielectric(refraction_index: f64) -> Self {
        Material::Dielectric { refraction_index }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match *self {
            Material::Lambertian { albedo } => Some(scatter_lambertian(albedo, rec, rng)),
            Material::Metal { albedo, fuzz } => scatter_metal(albedo, fuzz, ray_in, rec, rng),
            Material::Dielectric { refraction_index } => {
                Some(scatter_dielectric(refraction_index, ray_in, rec, rng))
            }
        }
    }
}

fn scatter_lambertian(albedo: Color, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
    let mut scatter_direction = rec.normal + random_unit_vector(rng);

    // Catch degenerate scatter direction
    if scatter_direction.near_zero() {
        scatter_direction = rec.normal;
    }

    ScatterResult {
        attenuation: albedo,
        scattered: Ray::new(rec.p, scatter_direction),
    }
}

fn scatter_metal(
    albedo: Color,
    fuzz: f64,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Option<ScatterResult> {
    let reflected = reflect(ray_in.direction().normalize(), rec.normal);
    let direction = reflected + fuzz * random_unit_vector(rng);

    // A fuzzed reflection that dips below the surface is absorbed.
    if direction.dot(rec.normal) > 0.0 {
        Some(ScatterResult {
            attenuation: albedo,
            scattered: Ray::new(rec.p, direction),
        })
    } else {
        None
    }
}

fn scatter_dielectric(
    refraction_index: f64,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> ScatterResult {
    let refraction_ratio = if rec.front_face {
        1.0 / refraction_index
    } else {
        refraction_index
    };

    let unit_direction = ray_in.direction().normalize();
    let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

    // Total internal reflection
    let cannot_refract = refraction_ratio * sin_theta > 1.0;

    let direction =
        if cannot_refract || random_f64(rng) < reflectance(cos_theta, refraction_ratio) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

    ScatterResult {
        attenuation: Color::ONE,
        scattered: Ray::new(rec.p, direction),
    }
}

/// Schlick's approximation for reflectance.
pub fn reflectance(cosine: f64, refraction_ratio: f64) -> f64 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

fn clamp_fuzz(fuzz: f64) -> f64 {
    fuzz.clamp(0.0, 1.0)
}
