use crate::foundation::error::{PosterError, PosterResult};

/// Coverage bitmap for one glyph at one pixel size.
///
/// `left` is the offset from the pen position to the bitmap's left edge, `top` the distance from
/// the baseline up to the bitmap's top row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphMask {
    /// Bitmap width in px.
    pub width: u32,
    /// Bitmap height in px.
    pub height: u32,
    /// Pen to left edge offset in px.
    pub left: i32,
    /// Baseline to top row distance in px.
    pub top: i32,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

impl GlyphMask {
    /// Mask with no pixels, used for whitespace.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            left: 0,
            top: 0,
            coverage: Vec::new(),
        }
    }

    /// No pixels to draw.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Vertical font metrics at a given size. Both values are positive distances from the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    /// Baseline to top of the content area.
    pub ascent: f32,
    /// Baseline to bottom of the content area.
    pub descent: f32,
}

impl LineMetrics {
    /// Ascent plus descent.
    pub fn content_height(self) -> f32 {
        self.ascent + self.descent
    }

    /// Baseline position for a line box of `box_height` starting at `box_top`, with the content
    /// area centered in the box (CSS half-leading).
    pub fn baseline_in_box(self, box_top: f32, box_height: f32) -> f32 {
        box_top + (box_height - self.content_height()) * 0.5 + self.ascent
    }
}

/// Font backend used for both measuring and drawing.
///
/// Advances are nominal per-character advances: there is no shaping, so kerning and ligatures
/// never apply and the width of a string is exactly the sum of its characters' advances.
pub trait FontFace: Send + Sync {
    /// Family name used in logs and diagnostics.
    fn family_name(&self) -> &str;

    /// Horizontal advance of `ch` at `size_px`.
    fn advance(&self, ch: char, size_px: f32) -> f32;

    /// Ascent/descent at `size_px`.
    fn line_metrics(&self, size_px: f32) -> LineMetrics;

    /// Whether the face has a real glyph for `ch` (not the fallback box).
    fn has_glyph(&self, ch: char) -> bool;

    /// Coverage mask of `ch` at `size_px`.
    fn rasterize(&self, ch: char, size_px: f32) -> GlyphMask;
}

/// [`FontFace`] backed by a TrueType/OpenType font parsed with `fontdue`.
pub struct FontdueFace {
    font: fontdue::Font,
    family: String,
}

impl std::fmt::Debug for FontdueFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueFace")
            .field("family", &self.family)
            .field("glyph_count", &self.font.glyph_count())
            .finish()
    }
}

impl FontdueFace {
    /// Parse font bytes. `collection_index` selects a face inside a TTC.
    pub fn from_bytes(
        bytes: &[u8],
        collection_index: u32,
        fallback_family: impl Into<String>,
    ) -> PosterResult<Self> {
        let settings = fontdue::FontSettings {
            collection_index,
            ..fontdue::FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(bytes, settings)
            .map_err(|e| PosterError::asset_load(format!("parse font: {e}")))?;
        let family = font
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_family.into());
        Ok(Self { font, family })
    }
}

impl FontFace for FontdueFace {
    fn family_name(&self) -> &str {
        &self.family
    }

    fn advance(&self, ch: char, size_px: f32) -> f32 {
        self.font.metrics(ch, size_px).advance_width
    }

    fn line_metrics(&self, size_px: f32) -> LineMetrics {
        match self.font.horizontal_line_metrics(size_px) {
            Some(m) => LineMetrics {
                ascent: m.ascent,
                descent: -m.descent,
            },
            None => LineMetrics {
                ascent: size_px * 0.8,
                descent: size_px * 0.2,
            },
        }
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }

    fn rasterize(&self, ch: char, size_px: f32) -> GlyphMask {
        let (m, coverage) = self.font.rasterize(ch, size_px);
        if m.width == 0 || m.height == 0 {
            return GlyphMask::empty();
        }
        GlyphMask {
            width: m.width as u32,
            height: m.height as u32,
            left: m.xmin,
            top: m.ymin + m.height as i32,
            coverage,
        }
    }
}

/// Deterministic face that draws every visible character as a solid block.
///
/// Every non-space character advances `advance_em` and whitespace advances `space_em`. Useful
/// for layout drafts without a font file and for reproducible tests.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockFace {
    /// Advance of visible characters in em.
    pub advance_em: f32,
    /// Advance of whitespace in em.
    pub space_em: f32,
}

impl Default for BlockFace {
    fn default() -> Self {
        Self {
            advance_em: 0.6,
            space_em: 0.3,
        }
    }
}

impl FontFace for BlockFace {
    fn family_name(&self) -> &str {
        "block"
    }

    fn advance(&self, ch: char, size_px: f32) -> f32 {
        if ch.is_whitespace() {
            self.space_em * size_px
        } else {
            self.advance_em * size_px
        }
    }

    fn line_metrics(&self, size_px: f32) -> LineMetrics {
        LineMetrics {
            ascent: size_px * 0.8,
            descent: size_px * 0.2,
        }
    }

    fn has_glyph(&self, _ch: char) -> bool {
        true
    }

    fn rasterize(&self, ch: char, size_px: f32) -> GlyphMask {
        if ch.is_whitespace() {
            return GlyphMask::empty();
        }
        let advance = self.advance(ch, size_px);
        let width = (advance * 0.8).round().max(1.0) as u32;
        let height = (size_px * 0.7).round().max(1.0) as u32;
        GlyphMask {
            width,
            height,
            left: (advance * 0.1).round() as i32,
            top: height as i32,
            coverage: vec![255; width as usize * height as usize],
        }
    }
}
