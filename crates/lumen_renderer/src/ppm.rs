//! Plain-text PPM (`P3`) output.

use crate::renderer::{color_to_rgb8, ImageBuffer};
use crate::Color;
use std::io::{self, BufWriter, Write};

/// Write the `P3` header for a `width` x `height` image with 8-bit channels.
pub fn write_header<W: Write>(writer: &mut W, width: u32, height: u32) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")
}

/// Write one `R G B` line per pixel.
pub fn write_pixels<W: Write>(writer: &mut W, pixels: &[Color]) -> io::Result<()> {
    for &color in pixels {
        let [r, g, b] = color_to_rgb8(color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }
    Ok(())
}

/// Write a rendered image as a complete PPM file.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: W) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    write_header(&mut writer, image.width, image.height)?;
    write_pixels(&mut writer, &image.pixels)?;
    writer.flush()
}
