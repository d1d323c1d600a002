//! Image sinks: stdout PPM, PPM files and PNG files.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use lumen_renderer::{write_ppm, ImageBuffer};

/// Where the rendered image goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Plain-text PPM streamed to stdout
    Stdout,
    Ppm(PathBuf),
    Png(PathBuf),
}

impl OutputTarget {
    /// Pick the sink from the `--output` argument by its extension.
    pub fn from_arg(arg: &str) -> Result<Self> {
        if arg == "-" {
            return Ok(OutputTarget::Stdout);
        }

        let path = PathBuf::from(arg);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("ppm") => Ok(OutputTarget::Ppm(path)),
            Some("png") => Ok(OutputTarget::Png(path)),
            _ => bail!(
                "unsupported output '{}': use '-', a .ppm or a .png path",
                arg
            ),
        }
    }

    /// Write a finished image to this target.
    pub fn save(&self, image: &ImageBuffer) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                write_ppm(image, std::io::stdout().lock()).context("failed to write PPM to stdout")
            }
            OutputTarget::Ppm(path) => save_ppm(image, path),
            OutputTarget::Png(path) => save_png(image, path),
        }
    }
}

/// Save an image as plain-text PPM.
pub fn save_ppm(image: &ImageBuffer, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_ppm(image, file).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Image saved as {}", path.display());
    Ok(())
}

/// Save an image as 8-bit PNG, quantized the same way as the PPM output.
pub fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb_bytes())
        .context("pixel buffer does not match image dimensions")?;
    rgb.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Image saved as {}", path.display());
    Ok(())
}
