//! Camera for ray generation.
//!
//! [`CameraConfig`] holds what a user sets. [`Camera::initialize`] validates
//! it once and derives the viewport frame, producing an immutable [`Camera`]
//! that render workers share by reference.

use crate::error::ConfigError;
use lumen_math::random::{random_f64, random_in_unit_disk};
use lumen_math::{Point3, Ray, Vec3, Vec3Ext};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Largest image, in pixels, a camera will accept.
pub const MAX_IMAGE_PIXELS: u64 = 1 << 28;

/// User-facing camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    // Image settings
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,

    // Camera positioning
    /// Vertical field of view in degrees
    pub vfov: f64,
    pub look_from: Point3,
    pub look_at: Point3,
    /// Camera-relative "up" direction
    pub view_up: Vec3,

    // Lens settings
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f64,

    /// Jitter samples inside the pixel footprint (antialiasing).
    /// With jitter off every sample goes through the pixel center.
    pub jitter: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            view_up: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            jitter: true,
        }
    }
}

impl CameraConfig {
    /// Create a camera configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set image width and aspect ratio; the height is derived.
    pub fn with_image(mut self, aspect_ratio: f64, image_width: u32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.image_width = image_width;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, view_up: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.view_up = view_up;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Enable or disable antialiasing jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Image height derived from width and aspect ratio, at least 1.
    ///
    /// Saturates for configurations that [`validate`](Self::validate) rejects.
    pub fn image_height(&self) -> u32 {
        self.exact_image_height() as u32
    }

    fn exact_image_height(&self) -> f64 {
        (self.image_width as f64 / self.aspect_ratio).round().max(1.0)
    }

    /// Check that the configuration describes a usable viewport.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        if self.image_width == 0 {
            return Err(ConfigError::ZeroImageWidth);
        }
        let height = self.exact_image_height();
        if self.image_width as f64 * height > MAX_IMAGE_PIXELS as f64 {
            return Err(ConfigError::ImageTooLarge {
                width: self.image_width,
                height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.vfov));
        }
        for (name, v) in [
            ("look_from", self.look_from),
            ("look_at", self.look_at),
            ("view_up", self.view_up),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::NonFiniteVector(name));
            }
        }
        let view = self.look_from - self.look_at;
        if view.near_zero() {
            return Err(ConfigError::DegenerateViewDirection);
        }
        if self.view_up.cross(view.normalize()).near_zero() {
            return Err(ConfigError::ViewUpParallel);
        }
        if !(self.defocus_angle >= 0.0 && self.defocus_angle < 180.0) {
            return Err(ConfigError::InvalidDefocusAngle(self.defocus_angle));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return Err(ConfigError::InvalidFocusDistance(self.focus_dist));
        }
        Ok(())
    }
}

/// Initialized camera: configuration plus the derived viewport frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    config: CameraConfig,
    image_height: u32,

    // Derived frame
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f64,
}

impl Camera {
    /// Validate `config` and compute the derived state.
    ///
    /// Pure function of the configuration: initializing twice from the same
    /// config gives bit-identical cameras.
    pub fn initialize(config: CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let image_width = config.image_width;
        let image_height = config.image_height();
        let center = config.look_from;

        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (image_width as f64 / image_height as f64);

        // Calculate camera basis vectors
        let w = (config.look_from - config.look_at).normalize();
        let u = config.view_up.cross(w).normalize();
        let v = w.cross(u);

        // Viewport edges; V is negated so rows run top to bottom
        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        let pixel_delta_u = viewport_u / image_width as f64;
        let pixel_delta_v = viewport_v / image_height as f64;

        let viewport_upper_left =
            center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();
        let defocus_disk_u = u * defocus_radius;
        let defocus_disk_v = v * defocus_radius;

        Ok(Self {
            config,
            image_height,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u,
            defocus_disk_v,
            samples_scale: 1.0 / config.samples_per_pixel as f64,
        })
    }

    /// Generate a ray for pixel (i, j), counted from the top-left corner.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.config.jitter {
            sample_square(rng)
        } else {
            Vec3::ZERO
        };

        let pixel_sample = self.pixel00_loc
            + (i as f64 + offset.x) * self.pixel_delta_u
            + (j as f64 + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn image_width(&self) -> u32 {
        self.config.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.config.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f64 {
        self.samples_scale
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Camera basis `(u, v, w)`: right, up, and backwards from the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Location of the center of pixel (0, 0).
    pub fn pixel00_loc(&self) -> Point3 {
        self.pixel00_loc
    }

    pub fn pixel_deltas(&self) -> (Vec3, Vec3) {
        (self.pixel_delta_u, self.pixel_delta_v)
    }

    pub fn defocus_disk(&self) -> (Vec3, Vec3) {
        (self.defocus_disk_u, self.defocus_disk_v)
    }
}

/// Sample a random point in the square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(random_f64(rng) - 0.5, random_f64(rng) - 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pinhole() -> CameraConfig {
        CameraConfig::new()
            .with_image(1.0, 101)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    #[test]
    fn test_camera_basis() {
        let camera = Camera::initialize(pinhole()).unwrap();
        let (u, v, w) = camera.basis();

        assert_eq!(camera.center(), Point3::ZERO);
        assert!(w.abs_diff_eq(Vec3::Z, 1e-12));
        assert!(u.abs_diff_eq(Vec3::X, 1e-12));
        assert!(v.abs_diff_eq(Vec3::Y, 1e-12));
    }

    #[test]
    fn test_camera_basis_is_right_handed() {
        let config = pinhole().with_position(
            Point3::new(13.0, 2.0, 3.0),
            Point3::ZERO,
            Vec3::Y,
        );
        let camera = Camera::initialize(config).unwrap();
        let (u, v, w) = camera.basis();

        for axis in [u, v, w] {
            assert!((axis.length() - 1.0).abs() < 1e-12);
        }
        assert!(u.dot(v).abs() < 1e-12);
        assert!(v.dot(w).abs() < 1e-12);
        assert!(u.cross(v).abs_diff_eq(w, 1e-12));
    }

    #[test]
    fn test_center_ray_points_down_view_axis() {
        let camera = Camera::initialize(pinhole().with_jitter(false)).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(camera.image_height(), 101);
        let ray = camera.get_ray(50, 50, &mut rng);
        let d = ray.direction();
        assert!(d.x.abs() < 1e-12);
        assert!(d.y.abs() < 1e-12);
        assert!((d.z + 1.0).abs() < 1e-12);
        assert_eq!(ray.origin(), Point3::ZERO);
    }

    #[test]
    fn test_raster_orientation() {
        let camera = Camera::initialize(pinhole().with_jitter(false)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        // Pixel (0, 0) is the top-left corner of the image.
        let top_left = camera.get_ray(0, 0, &mut rng).direction();
        assert!(top_left.x < 0.0 && top_left.y > 0.0);

        let bottom_right = camera.get_ray(100, 100, &mut rng).direction();
        assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
    }

    #[test]
    fn test_jitter_stays_inside_pixel() {
        let camera = Camera::initialize(pinhole()).unwrap();
        let (du, dv) = camera.pixel_deltas();
        let mut rng = StdRng::seed_from_u64(3);

        let center = camera.pixel00_loc() + 10.0 * du + 20.0 * dv;
        for _ in 0..500 {
            let ray = camera.get_ray(10, 20, &mut rng);
            let offset = ray.at(1.0) - center;
            assert!(offset.dot(du.normalize()).abs() <= 0.5 * du.length() + 1e-12);
            assert!(offset.dot(dv.normalize()).abs() <= 0.5 * dv.length() + 1e-12);
        }
    }

    #[test]
    fn test_defocus_origin_on_disk() {
        let config = pinhole().with_lens(90.0, 10.0, 3.0);
        let camera = Camera::initialize(config).unwrap();
        let (disk_u, _) = camera.defocus_disk();
        let radius = 3.0 * 5f64.to_radians().tan();
        assert!((disk_u.length() - radius).abs() < 1e-12);

        let mut rng = StdRng::seed_from_u64(9);
        let mut moved = false;
        for _ in 0..100 {
            let origin = camera.get_ray(50, 50, &mut rng).origin();
            assert!(origin.length() < radius + 1e-12);
            assert_eq!(origin.z, 0.0);
            moved |= origin != Point3::ZERO;
        }
        assert!(moved);
    }

    #[test]
    fn test_image_height_rounds_and_clamps() {
        let config = CameraConfig::new().with_image(16.0 / 9.0, 400);
        assert_eq!(config.image_height(), 225);

        let config = CameraConfig::new().with_image(16.0 / 9.0, 401);
        assert_eq!(config.image_height(), 226);

        let config = CameraConfig::new().with_image(1000.0, 10);
        assert_eq!(config.image_height(), 1);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let config = pinhole().with_lens(40.0, 0.6, 10.0);
        let a = Camera::initialize(config).unwrap();
        let b = Camera::initialize(config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let base = pinhole();

        assert_eq!(
            Camera::initialize(base.with_image(1.0, 0)).unwrap_err(),
            ConfigError::ZeroImageWidth
        );
        assert_eq!(
            Camera::initialize(base.with_image(-1.0, 10)).unwrap_err(),
            ConfigError::InvalidAspectRatio(-1.0)
        );
        assert_eq!(
            Camera::initialize(base.with_quality(0, 10)).unwrap_err(),
            ConfigError::ZeroSamples
        );
        assert_eq!(
            Camera::initialize(base.with_quality(1, 0)).unwrap_err(),
            ConfigError::ZeroMaxDepth
        );
        assert_eq!(
            Camera::initialize(base.with_lens(180.0, 0.0, 1.0)).unwrap_err(),
            ConfigError::InvalidFieldOfView(180.0)
        );
        assert_eq!(
            Camera::initialize(base.with_lens(90.0, 0.6, 0.0)).unwrap_err(),
            ConfigError::InvalidFocusDistance(0.0)
        );
        assert_eq!(
            Camera::initialize(base.with_lens(90.0, -1.0, 1.0)).unwrap_err(),
            ConfigError::InvalidDefocusAngle(-1.0)
        );
        assert_eq!(
            Camera::initialize(base.with_position(Point3::ONE, Point3::ONE, Vec3::Y)).unwrap_err(),
            ConfigError::DegenerateViewDirection
        );
        assert_eq!(
            Camera::initialize(base.with_position(
                Point3::ZERO,
                Point3::new(0.0, -5.0, 0.0),
                Vec3::Y
            ))
            .unwrap_err(),
            ConfigError::ViewUpParallel
        );
        assert_eq!(
            Camera::initialize(base.with_position(
                Point3::new(f64::NAN, 0.0, 0.0),
                Point3::ZERO,
                Vec3::Y
            ))
            .unwrap_err(),
            ConfigError::NonFiniteVector("look_from")
        );
    }

    #[test]
    fn test_rejects_image_too_large() {
        // A tiny aspect ratio makes the height overflow u32.
        let err = Camera::initialize(pinhole().with_image(1e-12, 100)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ImageTooLarge { width: 100, height } if height > u32::MAX as f64
        ));

        // Fits in u32 per axis but not in the pixel budget.
        assert!(matches!(
            Camera::initialize(pinhole().with_image(1.0, 100_000)),
            Err(ConfigError::ImageTooLarge { width: 100_000, .. })
        ));

        // Right at the budget is fine.
        let config = pinhole().with_image(1.0, 1 << 14);
        assert_eq!(
            config.image_width as u64 * config.image_height() as u64,
            MAX_IMAGE_PIXELS
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_config_uses_defaults() {
        let config: CameraConfig =
            serde_json::from_str(r#"{"image_width": 320, "vfov": 20.0}"#).unwrap();
        assert_eq!(config.image_width, 320);
        assert_eq!(config.vfov, 20.0);
        assert_eq!(config.samples_per_pixel, CameraConfig::default().samples_per_pixel);
        assert!(config.jitter);
    }
}
