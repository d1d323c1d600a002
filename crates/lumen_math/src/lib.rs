//! Math types for the Lumen path tracer.
//!
//! Everything is double precision: `Vec3` is glam's `DVec3`, extended with
//! the reflection/refraction helpers and random sampling the tracer needs.

// Re-export glam for convenience
pub use glam;
pub use glam::{dvec3, DVec3};

mod interval;
mod ray;
pub mod random;
mod vec3;

pub use interval::Interval;
pub use ray::Ray;
pub use vec3::{reflect, refract, Color, Point3, Vec3, Vec3Ext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(2.0 * a, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_vec3_accumulate() {
        let mut acc = Color::ZERO;
        for _ in 0..4 {
            acc += Color::new(0.25, 0.5, 1.0);
        }
        assert_eq!(acc, Color::new(1.0, 2.0, 4.0));
    }
}
