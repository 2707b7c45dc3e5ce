use image::imageops::{self, FilterType};

use crate::foundation::core::Rect;
use crate::foundation::error::{SquareshotError, SquareshotResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::surface::Surface;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels, with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }
    if opacity >= 1.0 && src[3] == 255 {
        return src;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// [`over`] applied pixel by pixel across two equal-length buffers.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> SquareshotResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SquareshotError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`; parts outside `dst` are
/// dropped.
pub(crate) fn blit_over(dst: &mut Surface, src: &Surface, x: i64, y: i64) -> SquareshotResult<()> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src.width)).min(i64::from(dst.width));
    let y1 = (y + i64::from(src.height)).min(i64::from(dst.height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let span = ((x1 - x0) as usize) * 4;
    let dst_stride = dst.width as usize * 4;
    let src_stride = src.width as usize * 4;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx = (x0 - x) as usize;
        let d_start = dy as usize * dst_stride + x0 as usize * 4;
        let s_start = sy * src_stride + sx * 4;
        over_in_place(
            &mut dst.data[d_start..d_start + span],
            &src.data[s_start..s_start + span],
            1.0,
        )?;
    }
    Ok(())
}

/// Integer destination rectangle a scaled drawing lands on, plus the source region feeding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScaledDraw {
    pub(crate) src_x: u32,
    pub(crate) src_y: u32,
    pub(crate) src_w: u32,
    pub(crate) src_h: u32,
    pub(crate) dst_x: i64,
    pub(crate) dst_y: i64,
    pub(crate) dst_w: u32,
    pub(crate) dst_h: u32,
}

/// Work out which part of a `src_w x src_h` image placed at `placement` is visible inside a
/// `dst_w x dst_h` surface, and where its resampled pixels go.
///
/// Only the visible source region (plus at most one source pixel of slack per side) is
/// resampled, so extreme aspect ratios never produce oversized intermediate images.
pub(crate) fn plan_scaled_draw(
    src_w: u32,
    src_h: u32,
    placement: Rect,
    dst_w: u32,
    dst_h: u32,
) -> Option<ScaledDraw> {
    if src_w == 0 || src_h == 0 || placement.width() <= 0.0 || placement.height() <= 0.0 {
        return None;
    }
    let visible = placement.intersect(Rect::new(0.0, 0.0, f64::from(dst_w), f64::from(dst_h)));
    if visible.width() <= 0.0 || visible.height() <= 0.0 {
        return None;
    }

    let scale_x = placement.width() / f64::from(src_w);
    let scale_y = placement.height() / f64::from(src_h);

    let crop = |lo: f64, hi: f64, origin: f64, scale: f64, len: u32| -> (u32, u32) {
        let len = f64::from(len);
        let a = ((lo - origin) / scale).floor().clamp(0.0, len - 1.0);
        let b = ((hi - origin) / scale).ceil().clamp(a + 1.0, len);
        (a as u32, b as u32)
    };
    let (sx0, sx1) = crop(visible.x0, visible.x1, placement.x0, scale_x, src_w);
    let (sy0, sy1) = crop(visible.y0, visible.y1, placement.y0, scale_y, src_h);

    let edge = |origin: f64, s: u32, scale: f64| (origin + f64::from(s) * scale).round();
    let dx0 = edge(placement.x0, sx0, scale_x);
    let dx1 = edge(placement.x0, sx1, scale_x);
    let dy0 = edge(placement.y0, sy0, scale_y);
    let dy1 = edge(placement.y0, sy1, scale_y);

    Some(ScaledDraw {
        src_x: sx0,
        src_y: sy0,
        src_w: sx1 - sx0,
        src_h: sy1 - sy0,
        dst_x: dx0 as i64,
        dst_y: dy0 as i64,
        dst_w: (dx1 - dx0).max(1.0) as u32,
        dst_h: (dy1 - dy0).max(1.0) as u32,
    })
}

/// Draw `src` scaled into `placement` (destination pixel coordinates) over `dst`.
///
/// Edges snap to whole pixels; resampling uses a triangle filter, which never overshoots and so
/// keeps premultiplied pixels valid.
pub(crate) fn draw_scaled_over(
    dst: &mut Surface,
    src: &Surface,
    placement: Rect,
) -> SquareshotResult<()> {
    let Some(plan) = plan_scaled_draw(src.width, src.height, placement, dst.width, dst.height)
    else {
        return Ok(());
    };
    tracing::trace!(?plan, "draw scaled");

    let whole = plan.src_w == src.width && plan.src_h == src.height;
    let same_size = plan.dst_w == plan.src_w && plan.dst_h == plan.src_h;
    if whole && same_size {
        return blit_over(dst, src, plan.dst_x, plan.dst_y);
    }

    let cropped;
    let visible = if whole {
        src
    } else {
        cropped = src.crop(plan.src_x, plan.src_y, plan.src_w, plan.src_h)?;
        &cropped
    };
    if same_size {
        return blit_over(dst, visible, plan.dst_x, plan.dst_y);
    }
    let img = imageops::resize(
        &visible.view()?,
        plan.dst_w,
        plan.dst_h,
        FilterType::Triangle,
    );
    let scaled = Surface::from_raw(plan.dst_w, plan.dst_h, img.into_raw())?;

    blit_over(dst, &scaled, plan.dst_x, plan.dst_y)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
