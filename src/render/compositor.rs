use crate::effects::blur::blur_rgba8_premul;
use crate::effects::composite::{blit_over, draw_scaled_over, plan_scaled_draw};
use crate::effects::vignette::Vignette;
use crate::foundation::core::{Bitmap, Rect, RenderParams, Size};
use crate::foundation::error::SquareshotResult;
use crate::layout::fit::{FitMode, fit_rect};
use crate::render::surface::Surface;

/// Oversize factor of the background working canvas relative to the output.
pub const BACKGROUND_MARGIN: f64 = 1.2;
/// Fraction of the working canvas cut from the top and left when it is drawn into the output.
pub const BACKGROUND_CROP: f64 = 0.1;

const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 255];

/// Whole-pixel rectangle; `x`/`y` may be negative for placements that overflow the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Where each layer of a render lands, computed from the source size and output size alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Output edge length.
    pub output_size: u32,
    /// Edge length of the square background working canvas.
    pub canvas_size: u32,
    /// Cover-fitted source inside the working canvas (canvas coordinates).
    pub background: Rect,
    /// Offset of the working canvas in the output; negative, so the canvas overhangs every side.
    pub canvas_offset: i64,
    /// Contain-fitted source in output coordinates.
    pub foreground: Rect,
}

impl Placement {
    /// Lay out a `src_w x src_h` source in a `output_size` square.
    pub fn compute(src_w: u32, src_h: u32, output_size: u32) -> SquareshotResult<Self> {
        let target = Size::new(f64::from(output_size), f64::from(output_size));
        let bg = fit_rect(src_w, src_h, target, FitMode::Cover, BACKGROUND_MARGIN)?;
        let fg = fit_rect(src_w, src_h, target, FitMode::Contain, 1.0)?;
        let (canvas_size, _) = bg.region_px();
        let canvas_offset = -((f64::from(canvas_size) * BACKGROUND_CROP).round() as i64);
        Ok(Self {
            output_size,
            canvas_size,
            background: bg.placement,
            canvas_offset,
            foreground: fg.placement,
        })
    }

    /// Output pixels the sharp foreground is drawn on.
    pub fn foreground_px(&self, src_w: u32, src_h: u32) -> Option<PixelRect> {
        plan_scaled_draw(
            src_w,
            src_h,
            self.foreground,
            self.output_size,
            self.output_size,
        )
        .map(|p| PixelRect {
            x: p.dst_x,
            y: p.dst_y,
            width: p.dst_w,
            height: p.dst_h,
        })
    }

    /// Output pixels covered by the blurred working canvas.
    pub fn canvas_px(&self) -> PixelRect {
        PixelRect {
            x: self.canvas_offset,
            y: self.canvas_offset,
            width: self.canvas_size,
            height: self.canvas_size,
        }
    }
}

/// Builds square profile pictures: blurred cover-fill background, contained sharp foreground,
/// radial vignette.
///
/// The compositor holds no state; every call works only from its arguments, and all working
/// buffers are dropped before it returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct Compositor;

impl Compositor {
    /// Create a compositor.
    pub fn new() -> Self {
        Self
    }

    /// Render `source` into an `output_size x output_size` opaque bitmap.
    ///
    /// Fails with [`crate::SquareshotError::InvalidInput`] on out-of-range parameters and with
    /// [`crate::SquareshotError::Render`] when one of the full-size working buffers (source copy,
    /// background canvas, blur planes, output) cannot be allocated. Resampled intermediates come
    /// from `image::imageops::resize`, which aborts on allocation failure instead. The source is
    /// never modified.
    #[tracing::instrument(
        skip(self, source, params),
        fields(
            src_w = source.width(),
            src_h = source.height(),
            size = params.output_size,
            blur = params.blur_radius
        )
    )]
    pub fn render(&self, source: &Bitmap, params: &RenderParams) -> SquareshotResult<Bitmap> {
        params.validate()?;
        let size = params.output_size;
        let placement = Placement::compute(source.width(), source.height(), size)?;
        tracing::debug!(?placement, "layout");

        let src = Surface::from_bitmap(source)?;
        let background = background_layer(&src, &placement, params.blur_radius)?;

        let mut out = Surface::filled(size, size, OPAQUE_BLACK)?;
        blit_over(
            &mut out,
            &background,
            placement.canvas_offset,
            placement.canvas_offset,
        )?;
        drop(background);

        draw_scaled_over(&mut out, &src, placement.foreground)?;
        Vignette::for_square(size).apply(&mut out.data, size, size)?;

        out.into_bitmap()
    }
}

/// Render `source` with `params`; shorthand for [`Compositor::render`].
pub fn render(source: &Bitmap, params: &RenderParams) -> SquareshotResult<Bitmap> {
    Compositor::new().render(source, params)
}

/// Cover-fitted source on the oversized working canvas, blurred.
pub(crate) fn background_layer(
    src: &Surface,
    placement: &Placement,
    blur_radius: u32,
) -> SquareshotResult<Surface> {
    let c = placement.canvas_size;
    let mut canvas = Surface::new(c, c)?;
    draw_scaled_over(&mut canvas, src, placement.background)?;
    if blur_radius == 0 {
        return Ok(canvas);
    }
    let blurred = blur_rgba8_premul(&canvas.data, c, c, blur_radius)?;
    Surface::from_raw(c, c, blurred)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
