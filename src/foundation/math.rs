use crate::foundation::error::{SquareshotError, SquareshotResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Byte length of a tightly packed RGBA8 buffer, or a render failure on overflow.
pub(crate) fn rgba8_len(width: u32, height: u32) -> SquareshotResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SquareshotError::render("rgba buffer size overflow"))
}

/// Allocate a zeroed RGBA8 buffer, surfacing allocation refusal as an error instead of aborting.
pub(crate) fn alloc_rgba8(width: u32, height: u32) -> SquareshotResult<Vec<u8>> {
    let len = rgba8_len(width, height)?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        SquareshotError::render(format!("allocate {width}x{height} rgba buffer: {e}"))
    })?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Allocate a zeroed `f32` buffer of `len` samples, surfacing allocation refusal as an error.
pub(crate) fn alloc_f32(len: usize) -> SquareshotResult<Vec<f32>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| SquareshotError::render(format!("allocate {len} f32 samples: {e}")))?;
    buf.resize(len, 0.0);
    Ok(buf)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 255 || a == 0 {
            continue;
        }
        for c in &mut px[..3] {
            let v = (u32::from(*c) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
