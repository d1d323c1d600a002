//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a bounce budget
//! - Anti-aliasing via multi-sampling
//! - Gamma correction
//! - Row-parallel rendering with rayon into a raster-ordered buffer

use crate::error::{RenderError, RenderResult};
use crate::progress::{CancelToken, Progress};
use crate::{Camera, Hittable};
use lumen_math::{Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::Arc;
use std::time::Instant;

/// Lower bound on hit distance for every trace; keeps a scattered ray from
/// re-hitting the surface it just left.
const SHADOW_ACNE_EPSILON: f64 = 0.001;

/// Displayable channel range before scaling to 8 bits.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Render options that do not change the image, only how it is produced.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Base seed for the per-row generators. `None` draws a fresh seed per
    /// render, so two renders of the same scene differ in their noise.
    pub seed: Option<u64>,
    /// Worker threads; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    /// Optional row counter for progress reporting.
    pub progress: Option<Arc<Progress>>,
    /// Optional cancellation flag, checked before each row.
    pub cancel: Option<CancelToken>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_progress(mut self, progress: Arc<Progress>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub(crate) fn build_pool(&self) -> RenderResult<Option<ThreadPool>> {
        match self.threads {
            Some(threads) => Ok(Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("lumen-render-{i}"))
                    .build()?,
            )),
            None => Ok(None),
        }
    }

    pub(crate) fn start(&self, total_rows: u32) {
        if let Some(progress) = &self.progress {
            progress.start(total_rows);
        }
    }

    pub(crate) fn row_done(&self) {
        if let Some(progress) = &self.progress {
            progress.row_done();
        }
    }

    pub(crate) fn check_cancelled(&self) -> RenderResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(RenderError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Run `op` inside `pool` if there is one, otherwise on the global pool.
pub(crate) fn run_in_pool<R: Send>(pool: Option<&ThreadPool>, op: impl FnOnce() -> R + Send) -> R {
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Compute the color seen by a ray.
///
/// The bounce budget is a bias, not noise: light that would still be
/// arriving after `depth` bounces is dropped as black.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f64::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        // Absorbed
        None => Color::ZERO,
    }
}

/// Background: white at the bottom blending to sky blue at the top.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let quantize = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel: the mean of `samples_per_pixel` radiance samples.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        let ray = camera.get_ray(i, j, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), rng);
    }

    pixel_color * camera.samples_scale()
}

/// Seed for one row's generator.
///
/// Every row gets an independent stream derived from the render's base
/// seed, so the result does not depend on which worker renders the row.
fn row_seed(base_seed: u64, row: u32) -> u64 {
    let mut state = base_seed ^ (row as u64).wrapping_mul(0xD1B5_4A32_D192_ED03);
    splitmix64(&mut state)
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Render row `j` into `row`, which must be exactly one image row wide.
pub(crate) fn render_row(
    camera: &Camera,
    world: &dyn Hittable,
    base_seed: u64,
    j: u32,
    row: &mut [Color],
) {
    let mut rng = StdRng::seed_from_u64(row_seed(base_seed, j));
    for (i, pixel) in row.iter_mut().enumerate() {
        *pixel = render_pixel(camera, world, i as u32, j, &mut rng);
    }
}

/// Averaged linear colors for a whole image, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Gamma-corrected 8-bit pixels in raster order.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().map(|&c| color_to_rgb8(c)).collect()
    }

    /// Flat `RGBRGB...` bytes, for handing to image encoders.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&c| color_to_rgb8(c)).collect()
    }
}

/// Render the entire scene, rows distributed across worker threads.
///
/// Output is in raster order regardless of which worker finished first.
/// On cancellation no image is returned.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    options: &RenderOptions,
) -> RenderResult<ImageBuffer> {
    let width = camera.image_width();
    let height = camera.image_height();
    let base_seed = options.resolve_seed();
    let pool = options.build_pool()?;

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} on {} threads",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth(),
        pool.as_ref()
            .map_or_else(rayon::current_num_threads, |p| p.current_num_threads())
    );
    let start = Instant::now();
    options.start(height);

    let mut image = ImageBuffer::new(width, height);
    let pixels = &mut image.pixels;
    run_in_pool(pool.as_ref(), || {
        pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .try_for_each(|(j, row)| {
                options.check_cancelled()?;
                render_row(camera, world, base_seed, j as u32, row);
                options.row_done();
                Ok::<(), RenderError>(())
            })
    })?;

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

/// Render the entire scene on the calling thread, top row first.
///
/// Produces the same image as [`render`] for the same seed.
pub fn render_single(
    camera: &Camera,
    world: &dyn Hittable,
    options: &RenderOptions,
) -> RenderResult<ImageBuffer> {
    let width = camera.image_width();
    let height = camera.image_height();
    let base_seed = options.resolve_seed();

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} single-threaded",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth()
    );
    let start = Instant::now();
    options.start(height);

    let mut image = ImageBuffer::new(width, height);
    for (j, row) in image.pixels.chunks_mut(width as usize).enumerate() {
        options.check_cancelled()?;
        render_row(camera, world, base_seed, j as u32, row);
        options.row_done();
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
