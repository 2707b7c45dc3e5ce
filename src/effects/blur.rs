use rayon::prelude::*;

use crate::foundation::error::{SquareshotError, SquareshotResult};
use crate::foundation::math::{alloc_f32, alloc_rgba8, rgba8_len};

/// Kernel half-width in standard deviations. The discarded tail is below 1e-6 of the mass.
const KERNEL_EXTENT: f64 = 5.0;

/// Added before flooring in the final quantization. Slightly under one half, so a plateau sitting
/// exactly between two levels (e.g. the mean of black and white) rounds the same way at every
/// radius instead of toggling on float residue.
const ROUND_BIAS: f32 = 0.5 - 1.0 / 64.0;

/// Blur a premultiplied RGBA8 buffer.
///
/// `radius` follows the CSS `blur(<radius>px)` convention: it is the standard deviation of the
/// Gaussian. A radius of `0` returns the input unchanged. Edges are mirrored (`... 1 0 | 0 1 ...`),
/// and both passes run in `f32` with a single rounding at the end; before that rounding, every
/// larger radius leaves strictly less high-frequency detail.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
) -> SquareshotResult<Vec<u8>> {
    let expected_len = rgba8_len(width, height)?;
    if src.len() != expected_len {
        return Err(SquareshotError::render(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let blurred = blur_to_f32(src, width, height, radius)?;
    let mut out = alloc_rgba8(width, height)?;
    quantize_premul(&blurred, &mut out);
    Ok(out)
}

/// Separable Gaussian blur without the final quantization. `src` must hold `width*height*4` bytes.
pub(crate) fn blur_to_f32(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
) -> SquareshotResult<Vec<f32>> {
    let len = rgba8_len(width, height)?;
    let kernel = gaussian_half_kernel(radius);
    let mut tmp = alloc_f32(len)?;
    horizontal_pass(src, &mut tmp, width, &kernel);
    let mut out = alloc_f32(len)?;
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Center tap followed by the taps at distance 1, 2, ...; normalized so the full symmetric kernel
/// sums to 1.
fn gaussian_half_kernel(radius: u32) -> Vec<f32> {
    if radius == 0 {
        return vec![1.0];
    }
    let sigma = f64::from(radius);
    let extent = (KERNEL_EXTENT * sigma).ceil() as usize;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (0..=extent)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum = weights[0] + 2.0 * weights[1..].iter().sum::<f64>();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Mirror an out-of-range index back into `0..n`, repeating the edge pixel:
/// `-1 -> 0`, `-2 -> 1`, `n -> n - 1`. Works for offsets of any size.
fn reflect(i: i64, n: i64) -> usize {
    let m = i.rem_euclid(2 * n);
    (if m < n { m } else { 2 * n - 1 - m }) as usize
}

fn horizontal_pass(src: &[u8], dst: &mut [f32], width: u32, k: &[f32]) {
    let w = width as usize;
    let r = k.len() - 1;
    let stride = w * 4;
    dst.par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each_init(Vec::new, |padded: &mut Vec<f32>, (out_row, row)| {
            padded.clear();
            for i in 0..w + 2 * r {
                let sx = reflect(i as i64 - r as i64, w as i64) * 4;
                padded.extend(row[sx..sx + 4].iter().map(|&v| f32::from(v)));
            }
            for (x, out) in out_row.chunks_exact_mut(4).enumerate() {
                let center = (x + r) * 4;
                for (c, o) in out.iter_mut().enumerate() {
                    let p = center + c;
                    let mut acc = k[0] * padded[p];
                    for (i, &kw) in k.iter().enumerate().skip(1) {
                        acc += kw * (padded[p - i * 4] + padded[p + i * 4]);
                    }
                    *o = acc;
                }
            }
        });
}

fn vertical_pass(src: &[f32], dst: &mut [f32], width: u32, height: u32, k: &[f32]) {
    let stride = width as usize * 4;
    let h = i64::from(height);
    dst.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let y = y as i64;
            for (o, &v) in out_row.iter_mut().zip(reflected_row(src, y, h, stride)) {
                *o = k[0] * v;
            }
            for (i, &kw) in k.iter().enumerate().skip(1) {
                let up = reflected_row(src, y - i as i64, h, stride);
                let down = reflected_row(src, y + i as i64, h, stride);
                for ((o, &a), &b) in out_row.iter_mut().zip(up).zip(down) {
                    *o += kw * (a + b);
                }
            }
        });
}

fn reflected_row(src: &[f32], y: i64, height: i64, stride: usize) -> &[f32] {
    let y = reflect(y, height);
    &src[y * stride..(y + 1) * stride]
}

fn quantize_premul(src: &[f32], dst: &mut [u8]) {
    dst.par_chunks_mut(4)
        .zip(src.par_chunks(4))
        .for_each(|(out, px)| {
            let a = quantize(px[3]);
            for c in 0..3 {
                out[c] = quantize(px[c]).min(a);
            }
            out[3] = a;
        });
}

fn quantize(v: f32) -> u8 {
    (v + ROUND_BIAS).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
