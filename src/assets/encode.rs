use std::io::Cursor;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::foundation::core::Bitmap;
use crate::foundation::error::SquareshotResult;

/// Encode a bitmap as PNG.
pub fn encode_png(bmp: &Bitmap) -> SquareshotResult<Vec<u8>> {
    let img = bmp.to_rgba_image()?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Suggested file name for saving a rendered picture taken at `at`, e.g.
/// `profile-2026-10-19T08-30-05-123Z.png`. The timestamp carries no `:` or `.` so it is valid on
/// every common filesystem.
pub fn download_file_name(at: DateTime<Utc>) -> String {
    format!("profile-{}.png", at.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
