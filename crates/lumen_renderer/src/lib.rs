//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for spheres with diffuse, metal and glass
//! materials, rendered across worker threads into a raster-ordered image.

mod band;
mod camera;
mod error;
mod hittable;
mod material;
mod ppm;
mod progress;
mod renderer;
mod sphere;

pub use band::{generate_bands, render_band, render_to_writer, Band, BandResult, ROWS_PER_WORKER};
pub use camera::{Camera, CameraConfig, MAX_IMAGE_PIXELS};
pub use error::{ConfigError, RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflectance, Material, ScatterResult};
pub use ppm::{write_header, write_pixels, write_ppm};
pub use progress::{CancelToken, Progress};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, render_single, sky_gradient,
    ImageBuffer, RenderOptions,
};
pub use sphere::Sphere;

/// Re-export the math types used throughout the public API.
pub use lumen_math::{Color, Interval, Point3, Ray, Vec3};
