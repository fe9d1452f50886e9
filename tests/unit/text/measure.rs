use super::*;
use crate::text::face::BlockFace;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-2
}

#[test]
fn width_is_advances_plus_inner_tracking() {
    let face = BlockFace::default();
    // 3 glyphs * 0.6em + 2 gaps * 0.2em, at 10px.
    assert!(approx(measure_width(&face, "ABC", 10.0, 0.2), 18.0 + 4.0));
    assert!(approx(measure_width(&face, "A", 10.0, 0.2), 6.0));
    assert_eq!(measure_width(&face, "", 10.0, 0.2), 0.0);
}

#[test]
fn per_glyph_sum_matches_whole_string() {
    let face = BlockFace::default();
    let text = "LA RUMBA DEL PERDÓN";
    let line = layout_glyphs(&face, text, 37.0, 0.22, None);
    let sum: f32 = text.chars().map(|c| face.advance(c, 37.0)).sum::<f32>()
        + (text.chars().count() as f32 - 1.0) * 0.22 * 37.0;
    assert!(approx(line.width, sum));
    assert_eq!(line.text(), text);
    assert!(!line.truncated);
}

#[test]
fn glyph_positions_accumulate_advance_and_tracking() {
    let face = BlockFace::default();
    let line = layout_glyphs(&face, "A B", 10.0, 0.5, None);
    let xs: Vec<f32> = line.glyphs.iter().map(|g| g.x).collect();
    assert!(approx(xs[0], 0.0));
    assert!(approx(xs[1], 6.0 + 5.0));
    assert!(approx(xs[2], 6.0 + 5.0 + 3.0 + 5.0));
}

#[test]
fn truncation_stops_before_the_first_overflowing_glyph() {
    let face = BlockFace::default();
    // Glyph right edges at 6, 13, 20, 27 with 1px tracking.
    let line = layout_glyphs(&face, "ABCD", 10.0, 0.1, Some(21.0));
    assert_eq!(line.text(), "ABC");
    assert!(line.truncated);
    assert!(line.width <= 21.0);

    let none = layout_glyphs(&face, "ABCD", 10.0, 0.1, Some(5.0));
    assert!(none.glyphs.is_empty());
    assert!(none.truncated);
    assert_eq!(none.width, 0.0);
}
