use anyhow::Context;

use crate::foundation::core::Bitmap;
use crate::foundation::error::{SquareshotError, SquareshotResult};

/// Largest upload accepted by [`decode_upload`], in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Formats accepted by [`decode_upload`].
pub const UPLOAD_FORMATS: [image::ImageFormat; 3] = [
    image::ImageFormat::Jpeg,
    image::ImageFormat::Png,
    image::ImageFormat::Gif,
];

/// Decode an image in any format the `image` crate was built with into a straight-alpha bitmap.
pub fn decode_image(bytes: &[u8]) -> SquareshotResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Bitmap::from_rgba_image(dyn_img.to_rgba8())
}

/// Validate and decode a user upload.
///
/// Uploads must be non-empty, at most [`MAX_UPLOAD_BYTES`], and JPEG, PNG, or GIF (detected from
/// the bytes, not a file name). Animated GIFs decode to their first frame.
pub fn decode_upload(bytes: &[u8]) -> SquareshotResult<Bitmap> {
    check_upload(bytes)?;
    decode_image(bytes)
}

/// Upload policy check, without decoding.
pub fn check_upload(bytes: &[u8]) -> SquareshotResult<image::ImageFormat> {
    if bytes.is_empty() {
        return Err(SquareshotError::invalid_input("upload is empty"));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(SquareshotError::invalid_input(format!(
            "upload is {} bytes; the limit is {MAX_UPLOAD_BYTES} bytes (10 MiB)",
            bytes.len()
        )));
    }
    let format = image::guess_format(bytes)
        .ok()
        .filter(|f| UPLOAD_FORMATS.contains(f))
        .ok_or_else(|| {
            SquareshotError::invalid_input("unsupported image format; upload a JPEG, PNG, or GIF")
        })?;
    Ok(format)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
