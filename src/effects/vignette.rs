use rayon::prelude::*;

use crate::effects::composite::over;
use crate::foundation::core::Point;
use crate::foundation::error::{SquareshotError, SquareshotResult};
use crate::foundation::math::rgba8_len;

/// Radial darkening gradient.
///
/// Fully transparent black inside `inner_radius`, `max_alpha` black from `outer_radius` on,
/// linear in between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vignette {
    /// Gradient center in pixel coordinates.
    pub center: Point,
    /// Radius where darkening starts.
    pub inner_radius: f64,
    /// Radius where darkening reaches `max_alpha`.
    pub outer_radius: f64,
    /// Opacity of the black at and beyond `outer_radius`, in `[0, 1]`.
    pub max_alpha: f64,
}

impl Vignette {
    /// The profile-picture vignette for a `size x size` square: transparent within 30% of the
    /// edge length from the center, 30% black at one full edge length.
    pub fn for_square(size: u32) -> Self {
        let s = f64::from(size);
        Self {
            center: Point::new(s / 2.0, s / 2.0),
            inner_radius: s * 0.3,
            outer_radius: s,
            max_alpha: 0.3,
        }
    }

    /// Gradient alpha (0..=255) sampled at the center of pixel `(x, y)`.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let d = p.distance(self.center);
        let span = self.outer_radius - self.inner_radius;
        let t = if span <= 0.0 {
            if d >= self.outer_radius { 1.0 } else { 0.0 }
        } else {
            ((d - self.inner_radius) / span).clamp(0.0, 1.0)
        };
        (t * self.max_alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Blend the gradient over a premultiplied RGBA8 buffer.
    pub fn apply(&self, data: &mut [u8], width: u32, height: u32) -> SquareshotResult<()> {
        if data.len() != rgba8_len(width, height)? {
            return Err(SquareshotError::render(
                "vignette expects a buffer matching width*height*4",
            ));
        }
        if width == 0 {
            return Ok(());
        }
        data.par_chunks_mut(width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let a = self.alpha_at(x as u32, y as u32);
                    let out = over([px[0], px[1], px[2], px[3]], [0, 0, 0, a], 1.0);
                    px.copy_from_slice(&out);
                }
            });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/vignette.rs"]
mod tests;
