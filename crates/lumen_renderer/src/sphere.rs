//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use lumen_math::{Interval, Point3, Ray};
use std::sync::Arc;

/// A sphere primitive.
///
/// A negative radius keeps the same surface but flips the outward normal
/// inward. Nesting a negative sphere inside a positive one of the same
/// dielectric gives a hollow glass shell.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// The radius must be non-zero; scene loading rejects zero radii before
    /// they get here.
    pub fn new(center: Point3, radius: f64, material: impl Into<Arc<Material>>) -> Self {
        debug_assert!(radius != 0.0, "sphere radius must be non-zero");
        Self {
            center,
            radius,
            material: material.into(),
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let half_b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        // Dividing by the signed radius is what turns a negative sphere inside out.
        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(ray, root, outward_normal, &self.material))
    }
}
