//! Vector algebra on top of glam's `DVec3`.
//!
//! glam already covers the arithmetic operators, dot/cross and
//! normalization. What is left here is the optics: mirror reflection,
//! Snell refraction and the degenerate-direction test used by scatter.

use glam::DVec3;

/// 3-component double-precision vector.
pub type Vec3 = DVec3;

/// A point in world space.
pub type Point3 = DVec3;

/// Linear RGB color, also used as the per-pixel radiance accumulator.
pub type Color = DVec3;

/// Per-axis threshold below which a vector counts as degenerate.
const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Extension methods for [`Vec3`] that glam does not provide.
pub trait Vec3Ext {
    /// True if every component is within 1e-8 of zero.
    fn near_zero(&self) -> bool;
}

impl Vec3Ext for DVec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        self.abs().cmplt(DVec3::splat(NEAR_ZERO_EPSILON)).all()
    }
}

/// Reflect `v` about the unit normal `n`.
///
/// `v - 2 * dot(v, n) * n`
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices on the incoming and
/// outgoing sides. The caller is responsible for detecting total internal
/// reflection first; past that point the parallel term is clamped so that a
/// tiny negative radicand from rounding cannot produce NaN.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).max(0.0).sqrt() * n;
    r_out_perp + r_out_parallel
}
