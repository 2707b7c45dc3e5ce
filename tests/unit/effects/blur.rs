use super::*;

fn single_bright_pixel(w: u32, h: u32) -> Vec<u8> {
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = (((h / 2) * w + w / 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
    src
}

fn stripes(w: u32, h: u32, period: u32) -> Vec<u8> {
    let mut src = Vec::with_capacity((w * h * 4) as usize);
    for _y in 0..h {
        for x in 0..w {
            let v = if (x / period) % 2 == 0 { 255 } else { 0 };
            src.extend_from_slice(&[v, v, v, 255]);
        }
    }
    src
}

/// Opaque gray noise from a fixed LCG.
fn noise(w: u32, h: u32) -> Vec<u8> {
    let mut state = 0x2545_f491_u32;
    let mut src = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let v = (state >> 24) as u8;
        src.extend_from_slice(&[v, v, v, 255]);
    }
    src
}

/// Sum of squared neighbor differences along rows: high-frequency energy of the red channel.
fn horizontal_energy(px: &[u8], w: u32) -> u64 {
    px.chunks_exact(w as usize * 4)
        .map(|row| {
            row.chunks_exact(4)
                .zip(row.chunks_exact(4).skip(1))
                .map(|(a, b)| u64::from(a[0].abs_diff(b[0])).pow(2))
                .sum::<u64>()
        })
        .sum()
}

fn horizontal_energy_f32(px: &[f32], w: u32) -> f64 {
    px.chunks_exact(w as usize * 4)
        .map(|row| {
            row.chunks_exact(4)
                .zip(row.chunks_exact(4).skip(1))
                .map(|(a, b)| (f64::from(a[0]) - f64::from(b[0])).powi(2))
                .sum::<f64>()
        })
        .sum()
}

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_rejects_mismatched_buffer() {
    let err = blur_rgba8_premul(&[0u8; 7], 1, 2, 3);
    assert!(matches!(err, Err(SquareshotError::Render(_))));
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (6u32, 5u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    // 40 reaches far past every edge, so the mirroring wraps several times.
    for radius in [1, 2, 3, 9, 40] {
        let out = blur_rgba8_premul(&src, w, h, radius).unwrap();
        assert_eq!(out, src, "radius {radius}");
    }
}

#[test]
fn half_kernel_is_normalized() {
    assert_eq!(gaussian_half_kernel(0), vec![1.0]);
    for radius in [1u32, 2, 7, 50] {
        let k = gaussian_half_kernel(radius);
        assert_eq!(k.len(), 5 * radius as usize + 1);
        let total = f64::from(k[0]) + 2.0 * k[1..].iter().map(|&v| f64::from(v)).sum::<f64>();
        assert!((total - 1.0).abs() < 1e-5, "radius {radius}: {total}");
        assert!(k.windows(2).all(|p| p[0] >= p[1]));
    }
}

#[test]
fn reflect_mirrors_with_edge_repeat() {
    assert_eq!(reflect(0, 4), 0);
    assert_eq!(reflect(-1, 4), 0);
    assert_eq!(reflect(-2, 4), 1);
    assert_eq!(reflect(4, 4), 3);
    assert_eq!(reflect(5, 4), 2);
    assert_eq!(reflect(9, 4), 1);
    assert_eq!(reflect(-9, 4), 0);
    assert_eq!(reflect(-3, 1), 0);
}

#[test]
fn blur_spreads_and_conserves_a_single_pixel() {
    let (w, h) = (31u32, 31u32);
    let src = single_bright_pixel(w, h);
    for radius in [1u32, 2, 4, 30] {
        let f = blur_to_f32(&src, w, h, radius).unwrap();
        let mass: f64 = f.chunks_exact(4).map(|px| f64::from(px[3])).sum();
        assert!((mass - 255.0).abs() < 1e-2, "radius {radius}: {mass}");
    }
    for radius in [1u32, 2, 4] {
        let out = blur_rgba8_premul(&src, w, h, radius).unwrap();
        let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(nonzero > 1, "radius {radius}");
    }
}

#[test]
fn blur_output_stays_premultiplied() {
    let (w, h) = (16u32, 9u32);
    let mut src = Vec::new();
    for i in 0..(w * h) {
        let a = ((i * 37) % 256) as u8;
        let c = ((i * 53) % 256) as u8;
        src.extend_from_slice(&[c.min(a), (c / 2).min(a), a, a]);
    }
    for radius in [1u32, 2, 5, 12] {
        let out = blur_rgba8_premul(&src, w, h, radius).unwrap();
        for px in out.chunks_exact(4) {
            assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
        }
    }
}

#[test]
fn unquantized_energy_strictly_falls_at_every_radius() {
    let (w, h) = (64u32, 16u32);
    let src = noise(w, h);
    let mut prev = f64::INFINITY;
    for radius in 0..=50u32 {
        let f = blur_to_f32(&src, w, h, radius).unwrap();
        let energy = horizontal_energy_f32(&f, w);
        assert!(energy < prev, "radius {radius}: {energy} !< {prev}");
        prev = energy;
    }
}

#[test]
fn larger_radius_never_sharpens_stripes() {
    let (w, h) = (120u32, 4u32);
    let src = stripes(w, h, 10);
    let sharp = horizontal_energy(&src, w);
    let mut prev = sharp;
    for radius in 0..=50u32 {
        let out = blur_rgba8_premul(&src, w, h, radius).unwrap();
        let energy = horizontal_energy(&out, w);
        assert!(energy <= prev, "radius {radius}: {energy} > {prev}");
        if radius == 1 {
            assert!(energy < sharp);
        }
        prev = energy;
    }
}

#[test]
fn blur_is_deterministic() {
    let (w, h) = (40u32, 33u32);
    let src = stripes(w, h, 3);
    let a = blur_rgba8_premul(&src, w, h, 7).unwrap();
    let b = blur_rgba8_premul(&src, w, h, 7).unwrap();
    assert_eq!(a, b);
}
