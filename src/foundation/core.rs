use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{SquareshotError, SquareshotResult};
use crate::foundation::math::rgba8_len;

pub use kurbo::{Point, Rect, Size};

/// Default square output edge in pixels.
pub const DEFAULT_OUTPUT_SIZE: u32 = 500;
/// Default background blur radius in pixels.
pub const DEFAULT_BLUR_RADIUS: u32 = 20;
/// Largest accepted output edge in pixels.
pub const MAX_OUTPUT_SIZE: u32 = 8192;
/// Largest accepted blur radius in pixels.
pub const MAX_BLUR_RADIUS: u32 = 256;

/// A decoded image as straight-alpha RGBA8 pixels.
///
/// Bitmaps are immutable once constructed: the dimensions are validated against the buffer
/// length up front and the pixels are only exposed by shared reference.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap a tightly packed, row-major RGBA8 buffer.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SquareshotResult<Self> {
        if width == 0 || height == 0 {
            return Err(SquareshotError::invalid_input(format!(
                "bitmap dimensions must be > 0 (got {width}x{height})"
            )));
        }
        let expected = rgba8_len(width, height)?;
        if data.len() != expected {
            return Err(SquareshotError::invalid_input(format!(
                "bitmap buffer must be width*height*4 = {expected} bytes (got {})",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a bitmap filled with one straight-alpha RGBA8 color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> SquareshotResult<Self> {
        let len = rgba8_len(width, height)?;
        Self::new(width, height, rgba.repeat(len / 4))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// RGBA8 bytes, tightly packed, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA8 value of the pixel at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Consume the bitmap and return its pixel buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Convert an `image` RGBA buffer into a bitmap.
    pub fn from_rgba_image(img: image::RgbaImage) -> SquareshotResult<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Copy the pixels into an `image` RGBA buffer (for encoding or further processing).
    pub fn to_rgba_image(&self) -> SquareshotResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| SquareshotError::render("bitmap buffer does not match its dimensions"))
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Output size presets offered by the editor UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizePreset {
    /// 500 x 500.
    Small,
    /// 800 x 800.
    Medium,
    /// 1080 x 1080.
    Large,
}

impl SizePreset {
    /// All presets, smallest first.
    pub const ALL: [SizePreset; 3] = [SizePreset::Small, SizePreset::Medium, SizePreset::Large];

    /// Square edge length in pixels.
    pub fn output_size(self) -> u32 {
        match self {
            SizePreset::Small => 500,
            SizePreset::Medium => 800,
            SizePreset::Large => 1080,
        }
    }

    /// Preset with exactly this edge length, if any.
    pub fn from_output_size(size: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.output_size() == size)
    }
}

/// Per-render parameters.
///
/// Parameters are plain values re-supplied on every call; nothing is remembered between renders.
/// Missing fields in JSON fall back to the defaults (`500` / `20`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderParams {
    /// Edge length of the square output, in pixels.
    pub output_size: u32,
    /// Background blur radius in pixels; `0` disables the blur.
    pub blur_radius: u32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            output_size: DEFAULT_OUTPUT_SIZE,
            blur_radius: DEFAULT_BLUR_RADIUS,
        }
    }
}

impl RenderParams {
    /// Create parameters without validating them; see [`RenderParams::validate`].
    pub fn new(output_size: u32, blur_radius: u32) -> Self {
        Self {
            output_size,
            blur_radius,
        }
    }

    /// Replace the output size with a preset's.
    pub fn with_preset(self, preset: SizePreset) -> Self {
        Self {
            output_size: preset.output_size(),
            ..self
        }
    }

    /// Check the parameter ranges.
    pub fn validate(&self) -> SquareshotResult<()> {
        if self.output_size == 0 {
            return Err(SquareshotError::invalid_input("output_size must be > 0"));
        }
        if self.output_size > MAX_OUTPUT_SIZE {
            return Err(SquareshotError::invalid_input(format!(
                "output_size must be <= {MAX_OUTPUT_SIZE} (got {})",
                self.output_size
            )));
        }
        if self.blur_radius > MAX_BLUR_RADIUS {
            return Err(SquareshotError::invalid_input(format!(
                "blur_radius must be <= {MAX_BLUR_RADIUS} (got {})",
                self.blur_radius
            )));
        }
        Ok(())
    }

    /// Parse and validate parameters from JSON.
    pub fn from_json_str(s: &str) -> SquareshotResult<Self> {
        let params: Self =
            serde_json::from_str(s).map_err(|e| SquareshotError::serde(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse, and validate parameters from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SquareshotResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read render params '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
