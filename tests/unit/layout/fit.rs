use super::*;

fn square(s: f64) -> Size {
    Size::new(s, s)
}

fn assert_rect_near(got: Rect, want: Rect) {
    for (a, b) in [(got.x0, want.x0), (got.y0, want.y0), (got.x1, want.x1), (got.y1, want.y1)] {
        assert!((a - b).abs() < 1e-9, "got {got:?}, want {want:?}");
    }
}

#[test]
fn contain_landscape_pins_width() {
    let fit = fit_rect(1000, 500, square(500.0), FitMode::Contain, 1.0).unwrap();
    assert_eq!(fit.region, square(500.0));
    assert_eq!(fit.placement, Rect::new(0.0, 125.0, 500.0, 375.0));
}

#[test]
fn contain_portrait_pins_height() {
    let fit = fit_rect(500, 1000, square(800.0), FitMode::Contain, 1.0).unwrap();
    assert_eq!(fit.placement, Rect::new(200.0, 0.0, 600.0, 800.0));
}

#[test]
fn cover_landscape_pins_height_in_oversized_region() {
    let fit = fit_rect(1000, 500, square(500.0), FitMode::Cover, 1.2).unwrap();
    assert_eq!(fit.region, square(600.0));
    assert_eq!(fit.region_px(), (600, 600));
    assert_eq!(fit.placement, Rect::new(-300.0, 0.0, 900.0, 600.0));
    assert!((fit.scale(1000) - 1.2).abs() < 1e-12);
}

#[test]
fn cover_portrait_pins_width() {
    let fit = fit_rect(300, 900, square(100.0), FitMode::Cover, 1.0).unwrap();
    assert_rect_near(fit.placement, Rect::new(0.0, -100.0, 100.0, 200.0));
}

#[test]
fn square_source_fills_region_in_both_modes() {
    for mode in [FitMode::Cover, FitMode::Contain] {
        let fit = fit_rect(64, 64, square(256.0), mode, 1.0).unwrap();
        assert_eq!(fit.placement, Rect::new(0.0, 0.0, 256.0, 256.0));
    }
}

#[test]
fn fit_preserves_aspect_ratio() {
    for &(w, h) in &[(1u32, 7u32), (13, 5), (4000, 3000), (999, 1000)] {
        for mode in [FitMode::Cover, FitMode::Contain] {
            let fit = fit_rect(w, h, square(333.0), mode, 1.2).unwrap();
            let r = fit.placement.width() / fit.placement.height();
            let expected = f64::from(w) / f64::from(h);
            assert!((r - expected).abs() < 1e-9 * expected.max(1.0));
        }
    }
}

#[test]
fn cover_always_covers_and_contain_always_fits() {
    for &(w, h) in &[(1u32, 7u32), (13, 5), (640, 480), (480, 640)] {
        let cover = fit_rect(w, h, square(240.0), FitMode::Cover, 1.0).unwrap();
        assert!(cover.placement.x0 <= 1e-9 && cover.placement.y0 <= 1e-9);
        assert!(cover.placement.x1 >= 240.0 - 1e-9 && cover.placement.y1 >= 240.0 - 1e-9);

        let contain = fit_rect(w, h, square(240.0), FitMode::Contain, 1.0).unwrap();
        assert!(contain.placement.x0 >= -1e-9 && contain.placement.y0 >= -1e-9);
        assert!(contain.placement.x1 <= 240.0 + 1e-9 && contain.placement.y1 <= 240.0 + 1e-9);
    }
}

#[test]
fn degenerate_inputs_are_invalid() {
    assert!(fit_rect(0, 10, square(10.0), FitMode::Cover, 1.0).is_err());
    assert!(fit_rect(10, 0, square(10.0), FitMode::Cover, 1.0).is_err());
    assert!(fit_rect(10, 10, square(0.0), FitMode::Contain, 1.0).is_err());
    assert!(fit_rect(10, 10, square(10.0), FitMode::Contain, 0.0).is_err());
    assert!(fit_rect(10, 10, square(10.0), FitMode::Contain, f64::NAN).is_err());
}
