use crate::text::face::FontFace;

/// One glyph placed on a line, `x` relative to the line start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Character drawn.
    pub ch: char,
    /// Pen position relative to the line start.
    pub x: f32,
    /// Nominal advance at the line size.
    pub advance: f32,
}

/// A single unwrapped line of positioned glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphLine {
    /// Glyphs in order.
    pub glyphs: Vec<PositionedGlyph>,
    /// Distance from the first glyph's origin to the last glyph's advance end. Trailing tracking
    /// after the last glyph is not counted.
    pub width: f32,
    /// Whether characters were dropped to honor `max_width`.
    pub truncated: bool,
}

impl GlyphLine {
    /// Characters kept on the line.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }
}

/// Lay out `text` on one line at `size_px` with `tracking_em` extra space between characters.
///
/// Glyph `i` starts at the sum of the previous glyphs' `advance + tracking`. With `max_width`
/// set, glyphs are emitted left to right and the line stops before the first glyph whose right
/// edge would exceed it (hard truncation, no wrapping).
///
/// This is the only measurement primitive: fitting and drawing both go through it, so a fitted
/// size is always the size the glyphs are drawn at.
pub fn layout_glyphs(
    face: &dyn FontFace,
    text: &str,
    size_px: f32,
    tracking_em: f32,
    max_width: Option<f32>,
) -> GlyphLine {
    let tracking = tracking_em * size_px;
    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    let mut width = 0.0f32;
    let mut truncated = false;

    for ch in text.chars() {
        let advance = face.advance(ch, size_px);
        let x = if glyphs.is_empty() { 0.0 } else { pen + tracking };
        if let Some(max) = max_width
            && x + advance > max
        {
            truncated = true;
            break;
        }
        glyphs.push(PositionedGlyph { ch, x, advance });
        pen = x + advance;
        width = pen;
    }

    GlyphLine {
        glyphs,
        width,
        truncated,
    }
}

/// Rendered width of `text` at `size_px`, including inter-character tracking.
pub fn measure_width(face: &dyn FontFace, text: &str, size_px: f32, tracking_em: f32) -> f32 {
    layout_glyphs(face, text, size_px, tracking_em, None).width
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
