//! Built-in scenes.

use lumen_math::{Color, Point3, Vec3};
use lumen_renderer::{CameraConfig, Material};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::description::SceneDescription;

/// Names accepted by [`crate::builtin`].
pub const BUILTIN_SCENES: &[&str] = &["three_spheres", "cover", "ground"];

/// Framing shared by the built-in scenes: 16:9, looking at the origin from
/// (13, 2, 3) with a slight depth of field.
fn showcase_camera() -> CameraConfig {
    CameraConfig::new()
        .with_image(16.0 / 9.0, 1200)
        .with_quality(500, 50)
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
}

/// Yellow ground with a diffuse, a hollow glass and a polished gold sphere.
pub fn three_spheres() -> SceneDescription {
    SceneDescription::new()
        .with_material("ground", Material::lambertian(Color::new(0.8, 0.8, 0.0)))
        .with_material("center", Material::lambertian(Color::new(0.1, 0.2, 0.5)))
        .with_material("left", Material::dielectric(1.5))
        .with_material("right", Material::metal(Color::new(0.8, 0.6, 0.2), 0.0))
        .with_sphere(Point3::new(0.0, -100.5, -1.0), 100.0, "ground")
        .with_sphere(Point3::new(0.0, 0.0, -1.0), 0.5, "center")
        .with_sphere(Point3::new(-1.0, 0.0, -1.0), 0.5, "left")
        .with_sphere(Point3::new(-1.0, 0.0, -1.0), -0.4, "left")
        .with_sphere(Point3::new(1.0, 0.0, -1.0), 0.5, "right")
        .with_camera(showcase_camera())
}

/// Grey ground plane with a single grey sphere resting on it.
pub fn ground() -> SceneDescription {
    SceneDescription::new()
        .with_material("grey", Material::lambertian(Color::new(0.5, 0.5, 0.5)))
        .with_sphere(Point3::new(0.0, -1000.0, 0.0), 1000.0, "grey")
        .with_sphere(Point3::new(0.0, 1.0, 0.0), 1.0, "grey")
        .with_camera(showcase_camera())
}

/// Field of small random spheres around three large ones.
///
/// The layout is a pure function of `seed`.
pub fn cover(seed: u64) -> SceneDescription {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut desc = SceneDescription::new()
        .with_material("ground", Material::lambertian(Color::new(0.5, 0.5, 0.5)))
        .with_material("glass", Material::dielectric(1.5))
        .with_material("brown", Material::lambertian(Color::new(0.4, 0.2, 0.1)))
        .with_material("steel", Material::metal(Color::new(0.7, 0.6, 0.5), 0.0))
        .with_sphere(Point3::new(0.0, -1000.0, 0.0), 1000.0, "ground")
        .with_sphere(Point3::new(0.0, 1.0, 0.0), 1.0, "glass")
        .with_sphere(Point3::new(-4.0, 1.0, 0.0), 1.0, "brown")
        .with_sphere(Point3::new(4.0, 1.0, 0.0), 1.0, "steel");

    for a in -11..11 {
        for b in -11..11 {
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            // Keep clear of the large metal sphere
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            let material = if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::new(
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                );
                Material::lambertian(albedo)
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                Material::metal(albedo, rng.gen_range(0.0..0.5))
            } else {
                // Glass spheres all share one material
                desc = desc.with_sphere(center, 0.2, "glass");
                continue;
            };

            let name = format!("small_{}_{}", a, b);
            desc = desc
                .with_material(name.clone(), material)
                .with_sphere(center, 0.2, name);
        }
    }

    desc.with_camera(showcase_camera())
}
