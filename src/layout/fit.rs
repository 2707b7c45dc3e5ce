use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{SquareshotError, SquareshotResult};

/// How a source is scaled into a target region. Both modes preserve the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FitMode {
    /// Cover the region entirely; the overflowing axis is cropped by the region bounds.
    Cover,
    /// Fit entirely inside the region; the short axis leaves a margin.
    Contain,
}

/// A fitted placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    /// Region the source was fitted into: the target scaled by the margin, floored to whole pixels.
    pub region: Size,
    /// Scaled source rectangle in region coordinates, centered on the region.
    pub placement: Rect,
}

impl Fit {
    /// Region size in whole pixels.
    pub fn region_px(&self) -> (u32, u32) {
        (self.region.width as u32, self.region.height as u32)
    }

    /// Scale factor applied to the source.
    pub fn scale(&self, src_w: u32) -> f64 {
        self.placement.width() / f64::from(src_w)
    }
}

/// Fit a `src_w x src_h` image into `target * margin`.
///
/// A margin of `1.0` fits the target itself; the background layer uses an oversized region so
/// that blurring never reaches its edges.
pub fn fit_rect(
    src_w: u32,
    src_h: u32,
    target: Size,
    mode: FitMode,
    margin: f64,
) -> SquareshotResult<Fit> {
    if src_w == 0 || src_h == 0 {
        return Err(SquareshotError::invalid_input(format!(
            "fit source dimensions must be > 0 (got {src_w}x{src_h})"
        )));
    }
    if !margin.is_finite() || margin <= 0.0 {
        return Err(SquareshotError::invalid_input("fit margin must be finite and > 0"));
    }
    let region = Size::new(
        (target.width * margin).floor(),
        (target.height * margin).floor(),
    );
    if !region.is_finite() || region.width < 1.0 || region.height < 1.0 {
        return Err(SquareshotError::invalid_input(format!(
            "fit region must be at least 1x1 (got {}x{})",
            region.width, region.height
        )));
    }

    let ratio = f64::from(src_w) / f64::from(src_h);
    let region_ratio = region.width / region.height;
    // Wider than the region: cover pins the height, contain pins the width.
    let wider = ratio > region_ratio;
    let (w, h) = match (mode, wider) {
        (FitMode::Cover, true) | (FitMode::Contain, false) => {
            (region.height * ratio, region.height)
        }
        (FitMode::Cover, false) | (FitMode::Contain, true) => (region.width, region.width / ratio),
    };

    let x0 = (region.width - w) / 2.0;
    let y0 = (region.height - h) / 2.0;
    Ok(Fit {
        region,
        placement: Rect::new(x0, y0, x0 + w, y0 + h),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
