use crate::foundation::core::Bitmap;
use crate::foundation::error::{SquareshotError, SquareshotResult};
use crate::foundation::math::{
    alloc_rgba8, premultiply_rgba8_in_place, rgba8_len, unpremultiply_rgba8_in_place,
};

/// Premultiplied RGBA8 working buffer used inside a single render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Surface {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
}

impl Surface {
    /// Transparent surface.
    pub(crate) fn new(width: u32, height: u32) -> SquareshotResult<Self> {
        Ok(Self {
            width,
            height,
            data: alloc_rgba8(width, height)?,
        })
    }

    /// Surface cleared to one premultiplied color.
    pub(crate) fn filled(width: u32, height: u32, premul: [u8; 4]) -> SquareshotResult<Self> {
        let mut s = Self::new(width, height)?;
        for px in s.data.chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
        Ok(s)
    }

    pub(crate) fn from_raw(width: u32, height: u32, data: Vec<u8>) -> SquareshotResult<Self> {
        if data.len() != rgba8_len(width, height)? {
            return Err(SquareshotError::render("surface buffer size mismatch"));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Premultiplied copy of a straight-alpha bitmap.
    pub(crate) fn from_bitmap(bmp: &Bitmap) -> SquareshotResult<Self> {
        let mut data = alloc_rgba8(bmp.width(), bmp.height())?;
        data.copy_from_slice(bmp.data());
        premultiply_rgba8_in_place(&mut data);
        Ok(Self {
            width: bmp.width(),
            height: bmp.height(),
            data,
        })
    }

    /// Copy of the `width x height` region at `(x, y)`, which must lie inside the surface.
    pub(crate) fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> SquareshotResult<Self> {
        if x.checked_add(width).is_none_or(|r| r > self.width)
            || y.checked_add(height).is_none_or(|b| b > self.height)
        {
            return Err(SquareshotError::render(format!(
                "crop {width}x{height}+{x}+{y} exceeds {}x{} surface",
                self.width, self.height
            )));
        }
        let mut data = alloc_rgba8(width, height)?;
        let src_stride = self.width as usize * 4;
        let span = width as usize * 4;
        for (row, out) in data.chunks_exact_mut(span.max(1)).enumerate() {
            let start = (y as usize + row) * src_stride + x as usize * 4;
            out.copy_from_slice(&self.data[start..start + span]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert back to a straight-alpha bitmap.
    pub(crate) fn into_bitmap(self) -> SquareshotResult<Bitmap> {
        let mut data = self.data;
        unpremultiply_rgba8_in_place(&mut data);
        Bitmap::new(self.width, self.height, data)
    }

    /// Borrow the pixels as an `image` buffer for cropping and resampling.
    pub(crate) fn view(&self) -> SquareshotResult<image::ImageBuffer<image::Rgba<u8>, &[u8]>> {
        image::ImageBuffer::from_raw(self.width, self.height, self.data.as_slice())
            .ok_or_else(|| SquareshotError::render("surface buffer size mismatch"))
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
