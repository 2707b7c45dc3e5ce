//! squareshot turns a photo into a square profile picture.
//!
//! A render stacks three layers on an `output_size x output_size` canvas:
//!
//! 1. **Background**: the photo cover-fitted into a working canvas 1.2x the output size, blurred,
//!    then drawn 10% up and to the left so the blurred copy overhangs every edge.
//! 2. **Foreground**: the photo contain-fitted and centered, unblurred.
//! 3. **Vignette**: a radial gradient from transparent (within 30% of the edge length from the
//!    center) to 30% black (one full edge length out).
//!
//! The core is [`Compositor::render`] (or [`render`]): a pure function of a decoded [`Bitmap`]
//! and [`RenderParams`]. Decoding uploads ([`decode_upload`]) and encoding results
//! ([`encode_png`]) are thin helpers around it.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce identical bytes, regardless of thread count.
//! - **Premultiplied RGBA8** internally; bitmaps at the API boundary are straight alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod effects;
mod foundation;
mod layout;
mod render;

pub use assets::decode::{
    MAX_UPLOAD_BYTES, UPLOAD_FORMATS, check_upload, decode_image, decode_upload,
};
pub use assets::encode::{download_file_name, encode_png};
pub use effects::blur::blur_rgba8_premul;
pub use effects::vignette::Vignette;
pub use foundation::core::{
    Bitmap, DEFAULT_BLUR_RADIUS, DEFAULT_OUTPUT_SIZE, MAX_BLUR_RADIUS, MAX_OUTPUT_SIZE, Point,
    Rect, RenderParams, SizePreset, Size,
};
pub use foundation::error::{SquareshotError, SquareshotResult};
pub use layout::fit::{Fit, FitMode, fit_rect};
pub use render::compositor::{
    BACKGROUND_CROP, BACKGROUND_MARGIN, Compositor, PixelRect, Placement, render,
};
