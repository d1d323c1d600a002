//! Band-based streaming rendering.
//!
//! Divides the image into bands of whole rows. Rows within a band render
//! in parallel; finished bands are flushed to the sink top to bottom, so
//! the output stays in raster order while only one band is held in memory.

use crate::error::{RenderError, RenderResult};
use crate::ppm;
use crate::renderer::{render_row, run_in_pool, RenderOptions};
use crate::{Camera, Color, Hittable};
use rayon::prelude::*;
use std::io::{BufWriter, Write};
use std::time::Instant;

/// Rows per band for each worker thread.
pub const ROWS_PER_WORKER: u32 = 2;

/// A horizontal strip of whole image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First row of the band
    pub y: u32,
    /// Number of rows in the band
    pub height: u32,
    /// Position of this band in output order
    pub index: usize,
}

impl Band {
    pub fn new(y: u32, height: u32, index: usize) -> Self {
        Self { y, height, index }
    }

    /// Rows covered by this band.
    pub fn rows(&self) -> std::ops::Range<u32> {
        self.y..self.y + self.height
    }
}

/// Split `image_height` rows into bands of at most `band_height` rows, top first.
///
/// A `band_height` of zero is treated as one.
pub fn generate_bands(image_height: u32, band_height: u32) -> Vec<Band> {
    let band_height = band_height.max(1);
    (0..image_height)
        .step_by(band_height as usize)
        .enumerate()
        .map(|(index, y)| Band::new(y, band_height.min(image_height - y), index))
        .collect()
}

/// Result of rendering a band.
#[derive(Debug, Clone)]
pub struct BandResult {
    /// The band that was rendered
    pub band: Band,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

/// Render one band, its rows spread across the current rayon pool.
///
/// Pixels match what [`crate::render`] produces for the same rows and seed.
pub fn render_band(
    band: Band,
    camera: &Camera,
    world: &dyn Hittable,
    base_seed: u64,
    options: &RenderOptions,
) -> RenderResult<BandResult> {
    let width = camera.image_width() as usize;
    let mut pixels = vec![Color::ZERO; width * band.height as usize];

    pixels
        .par_chunks_mut(width)
        .zip(band.rows().into_par_iter())
        .try_for_each(|(row, j)| {
            options.check_cancelled()?;
            render_row(camera, world, base_seed, j, row);
            options.row_done();
            Ok::<(), RenderError>(())
        })?;

    Ok(BandResult { band, pixels })
}

/// Render the scene and stream it to `writer` as plain-text PPM.
///
/// The header is written before any rendering starts. If the render is
/// cancelled, the bands finished so far have already been written.
pub fn render_to_writer<W: Write>(
    camera: &Camera,
    world: &dyn Hittable,
    options: &RenderOptions,
    writer: W,
) -> RenderResult<()> {
    let width = camera.image_width();
    let height = camera.image_height();
    let base_seed = options.resolve_seed();
    let pool = options.build_pool()?;
    let workers = pool
        .as_ref()
        .map_or_else(rayon::current_num_threads, |p| p.current_num_threads());
    let bands = generate_bands(height, workers as u32 * ROWS_PER_WORKER);

    log::info!(
        "Streaming {}x{} @ {} spp in {} bands on {} threads",
        width,
        height,
        camera.samples_per_pixel(),
        bands.len(),
        workers
    );
    let start = Instant::now();
    options.start(height);

    let mut out = BufWriter::new(writer);
    ppm::write_header(&mut out, width, height)?;

    for band in bands {
        let result = run_in_pool(pool.as_ref(), || {
            render_band(band, camera, world, base_seed, options)
        })?;
        ppm::write_pixels(&mut out, &result.pixels)?;
        out.flush()?;
        log::debug!("Flushed band {} (rows {:?})", band.index, band.rows());
    }

    log::info!("Streamed in {:?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{CancelToken, Progress};
    use crate::{render, write_ppm, CameraConfig, HittableList, Material, Sphere};
    use lumen_math::Point3;
    use std::sync::Arc;

    #[test]
    fn test_generate_bands_exact_fit() {
        let bands = generate_bands(12, 4);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[1], Band::new(4, 4, 1));

        let total_rows: u32 = bands.iter().map(|b| b.height).sum();
        assert_eq!(total_rows, 12);
    }

    #[test]
    fn test_generate_bands_partial_fit() {
        let bands = generate_bands(10, 4);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[2], Band::new(8, 2, 2));

        // Bands tile the image top to bottom without gaps
        let mut next = 0;
        for band in &bands {
            assert_eq!(band.y, next);
            next += band.height;
        }
        assert_eq!(next, 10);
    }

    #[test]
    fn test_generate_bands_degenerate() {
        assert!(generate_bands(0, 4).is_empty());
        assert_eq!(generate_bands(3, 0).len(), 3);
        assert_eq!(generate_bands(3, 100), vec![Band::new(0, 3, 0)]);
    }

    fn scene() -> (Camera, HittableList) {
        let mut world = HittableList::new();
        world.add(Sphere::new(
            Point3::new(0.0, -100.5, -1.0),
            100.0,
            Material::lambertian(Color::new(0.8, 0.8, 0.0)),
        ));
        world.add(Sphere::new(
            Point3::new(0.0, 0.0, -1.0),
            0.5,
            Material::dielectric(1.5),
        ));
        let camera =
            Camera::initialize(CameraConfig::new().with_image(1.5, 15).with_quality(3, 6)).unwrap();
        (camera, world)
    }

    #[test]
    fn test_stream_matches_buffered_render() {
        let (camera, world) = scene();
        let options = RenderOptions::new().with_seed(99).with_threads(2);

        let mut streamed = Vec::new();
        render_to_writer(&camera, &world, &options, &mut streamed).unwrap();

        let image = render(&camera, &world, &options).unwrap();
        let mut buffered = Vec::new();
        write_ppm(&image, &mut buffered).unwrap();

        assert_eq!(streamed, buffered);
    }

    #[test]
    fn test_stream_reports_progress() {
        let (camera, world) = scene();
        let progress = Arc::new(Progress::new());
        let options = RenderOptions::new().with_seed(1).with_progress(progress.clone());

        render_to_writer(&camera, &world, &options, std::io::sink()).unwrap();
        assert_eq!(progress.rows_completed(), camera.image_height());
        assert!(progress.is_finished());
    }

    #[test]
    fn test_cancelled_stream_writes_only_header() {
        let (camera, world) = scene();
        let token = CancelToken::new();
        token.cancel();
        let options = RenderOptions::new().with_cancel(token);

        let mut out = Vec::new();
        let result = render_to_writer(&camera, &world, &options, &mut out);
        assert!(matches!(result, Err(RenderError::Cancelled)));
        assert_eq!(String::from_utf8(out).unwrap(), "P3\n15 10\n255\n");
    }
}
