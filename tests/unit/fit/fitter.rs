use super::*;
use crate::text::face::BlockFace;

const SAMPLES: &[&str] = &[
    "",
    "A",
    "BERGHAIN",
    "LA PERLA",
    "MIO CRISTO PIANGE DIAMANTI",
    "SEXO, VIOLENCIA Y LLANTAS",
    "LA RUMBA DEL PERDÓN",
    "A VERY LONG TITLE THAT KEEPS GOING WELL PAST ANY REASONABLE COLUMN",
];

fn title_params() -> FitParams {
    FitParams::new(40, 104, 0.22)
}

#[test]
fn short_titles_get_the_maximum_size() {
    let face = BlockFace::default();
    let fitted = fit_text(&face, "BERGHAIN", 796.0, &title_params()).unwrap();
    assert_eq!(fitted.font_size, 104);
    assert!(!fitted.truncated);
    assert_eq!(fitted.line.text(), "BERGHAIN");
}

#[test]
fn picks_the_largest_size_that_fits_the_budget() {
    let face = BlockFace::default();
    // 10 glyphs: width = size * (10 * 0.6 + 9 * 0.22) = size * 7.98; budget = 500 * 0.985.
    let size = fit_font_size(&face, "ABCDEFGHIJ", 500.0, &title_params()).unwrap();
    assert_eq!(size, 61);
    assert!(measure_width(&face, "ABCDEFGHIJ", 61.0, 0.22) <= 500.0 * SAFETY_MARGIN);
    assert!(measure_width(&face, "ABCDEFGHIJ", 62.0, 0.22) > 500.0 * SAFETY_MARGIN);
}

#[test]
fn size_stays_in_range_and_width_within_budget() {
    let face = BlockFace::default();
    let params = title_params();
    for text in SAMPLES {
        for w in (0..1200).step_by(7) {
            let w = w as f32;
            let fitted = fit_text(&face, text, w, &params).unwrap();
            assert!(
                (params.min_px..=params.max_px).contains(&fitted.font_size),
                "{text:?} @ {w}: {}",
                fitted.font_size
            );
            assert!(
                fitted.line.width <= w * SAFETY_MARGIN + 1e-3,
                "{text:?} @ {w}: {} overflows",
                fitted.line.width
            );
            if fitted.truncated {
                assert_eq!(fitted.font_size, params.min_px);
                assert!(text.starts_with(&fitted.line.text()));
            } else {
                assert_eq!(fitted.line.text(), *text);
            }
        }
    }
}

#[test]
fn fitting_is_idempotent() {
    let face = BlockFace::default();
    for text in SAMPLES {
        let a = fit_text(&face, text, 640.0, &title_params()).unwrap();
        let b = fit_text(&face, text, 640.0, &title_params()).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn size_is_monotonic_in_available_width() {
    let face = BlockFace::default();
    for text in SAMPLES {
        let mut prev = 0;
        for w in (0..1500).step_by(5) {
            let size = fit_font_size(&face, text, w as f32, &title_params()).unwrap();
            assert!(size >= prev, "{text:?}: {size} < {prev} at width {w}");
            prev = size;
        }
    }
}

#[test]
fn truncation_is_deterministic_and_bounded() {
    let face = BlockFace::default();
    let long = "X".repeat(60);
    let a = fit_text(&face, &long, 796.0, &title_params()).unwrap();
    let b = fit_text(&face, &long, 796.0, &title_params()).unwrap();
    assert!(a.truncated);
    assert_eq!(a.font_size, 40);
    assert_eq!(a.line, b.line);
    assert!(a.line.width <= 796.0);
    // At 40px each glyph costs 24 + 8.8 of tracking; 24 glyphs end at 778.4 <= 784.06.
    assert_eq!(a.line.glyphs.len(), 24);
}

#[test]
fn zero_width_keeps_min_size_and_draws_nothing() {
    let face = BlockFace::default();
    let fitted = fit_text(&face, "BERGHAIN", 0.0, &title_params()).unwrap();
    assert_eq!(fitted.font_size, 40);
    assert!(fitted.truncated);
    assert!(fitted.line.glyphs.is_empty());
}

#[test]
fn empty_text_fits_at_max() {
    let face = BlockFace::default();
    let fitted = fit_text(&face, "", 100.0, &title_params()).unwrap();
    assert_eq!(fitted.font_size, 104);
    assert!(!fitted.truncated);
}

#[test]
fn invalid_params_are_rejected() {
    let face = BlockFace::default();
    let bad = [
        FitParams::new(0, 10, 0.0),
        FitParams::new(20, 10, 0.0),
        FitParams::new(10, 20, -0.1),
        FitParams::new(10, 20, f32::NAN),
        FitParams {
            safety_margin: 1.5,
            ..FitParams::new(10, 20, 0.0)
        },
    ];
    for p in bad {
        assert!(matches!(
            fit_font_size(&face, "A", 100.0, &p),
            Err(PosterError::Validation(_))
        ));
    }
    assert!(fit_font_size(&face, "A", f32::INFINITY, &title_params()).is_err());
    assert!(fit_font_size(&face, "A", -1.0, &title_params()).is_err());
}

#[test]
fn min_equal_max_always_returns_that_size() {
    let face = BlockFace::default();
    let p = FitParams::new(40, 40, 0.1);
    assert_eq!(fit_font_size(&face, "IV.", 80.0, &p).unwrap(), 40);
    assert_eq!(fit_font_size(&face, "IV.", 1.0, &p).unwrap(), 40);
}

#[test]
fn unbounded_max_size_does_not_overflow() {
    let face = BlockFace::default();
    let p = FitParams::new(1, u32::MAX, 0.0);
    assert_eq!(fit_font_size(&face, "", 100.0, &p).unwrap(), u32::MAX);
    // 0.6 em per glyph: floor(98.5 / 0.6) = 164.
    assert_eq!(fit_font_size(&face, "A", 100.0, &p).unwrap(), 164);
}

#[test]
fn text_is_measured_exactly_as_given() {
    let face = BlockFace::default();
    let p = title_params();
    let raw = fit_text(&face, "La  Perla ", 796.0, &p).unwrap();
    let shown = fit_text(&face, &crate::display_title("La  Perla "), 796.0, &p).unwrap();
    assert_eq!(raw.line.text(), "La  Perla ");
    assert_eq!(shown.line.text(), "LA PERLA");
    assert!(raw.line.width > shown.line.width);
}
