use crate::{
    assets::color::ColorDef,
    foundation::core::{Canvas, Point, Rect},
    foundation::math::Fnv1a64,
    text::measure::PositionedGlyph,
};

#[derive(Clone, Debug, PartialEq)]
/// Backend-agnostic drawing instructions for one poster.
///
/// A plan consists of:
/// - the canvas it was composed for (`canvas`)
/// - draw operations in painter's order (`ops`)
/// - the fitted rows the glyph runs were derived from (`rows`)
///
/// Preview and export both execute the same plan; only the backend scale differs.
pub struct PosterPlan {
    /// Canvas the plan is laid out on.
    pub canvas: Canvas,
    /// Drawing instructions in paint order.
    pub ops: Vec<DrawOp>,
    /// One entry per ranked title, in rank order.
    pub rows: Vec<FittedRow>,
}

#[derive(Clone, Debug, PartialEq)]
/// Draw operation emitted by the composer. Coordinates are canvas units.
pub enum DrawOp {
    /// Solid rectangle.
    Fill { rect: Rect, color: ColorDef },
    /// The prepared background image stretched into `dest` and clipped to the canvas.
    Background { dest: Rect },
    /// One line of text.
    GlyphRun(GlyphRun),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// What a glyph run belongs to. Used for diagnostics and tests.
pub enum RunRole {
    /// Rank marker of the 0-based `row`.
    RankMarker { row: usize },
    /// Title of the 0-based `row`.
    Title { row: usize },
    /// Signature line.
    Signature,
}

#[derive(Clone, Debug, PartialEq)]
/// Positioned glyphs drawn at one size and color.
pub struct GlyphRun {
    /// Which part of the poster the run draws.
    pub role: RunRole,
    /// Baseline start of the line; glyph `x` offsets are added to it.
    pub origin: Point,
    /// Font size in canvas px.
    pub size_px: u32,
    /// Ink color.
    pub color: ColorDef,
    /// Glyphs with `x` offsets relative to `origin`.
    pub glyphs: Vec<PositionedGlyph>,
    /// Advance width of the whole run.
    pub width: f32,
}

impl GlyphRun {
    /// Characters of the run, in draw order.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }

    /// Horizontal extent `[left, right]` covered by glyph advances.
    pub fn extent(&self) -> (f64, f64) {
        (self.origin.x, self.origin.x + f64::from(self.width))
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Layout result for one ranked title.
pub struct FittedRow {
    /// 0-based rank.
    pub index: usize,
    /// Rank marker text, for example `III.`.
    pub marker: String,
    /// Fitted marker size in px.
    pub marker_size: u32,
    /// Display form of the title (normalized, uppercased).
    pub title: String,
    /// Fitted title size in px.
    pub font_size: u32,
    /// The title lost trailing characters to fit its column.
    pub truncated: bool,
    /// Row box in canvas units.
    pub top: f32,
    /// Row box height; the next row starts `height + row_gap` lower.
    pub height: f32,
    /// Horizontal extent of the drawn title.
    pub text_left: f32,
    /// Right end of the drawn title.
    pub text_right: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// 128-bit content hash of a plan. Equal plans hash equal.
pub struct PlanFingerprint {
    /// High half of the hash.
    pub hi: u64,
    /// Low half of the hash.
    pub lo: u64,
}

impl std::fmt::Display for PlanFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

impl PosterPlan {
    /// Hash of everything that affects pixels.
    pub fn fingerprint(&self) -> PlanFingerprint {
        let mut h = PairHasher::new();
        h.u32(self.canvas.width);
        h.u32(self.canvas.height);
        h.u64(self.ops.len() as u64);
        for op in &self.ops {
            match op {
                DrawOp::Fill { rect, color } => {
                    h.u8(0);
                    h.rect(*rect);
                    h.color(*color);
                }
                DrawOp::Background { dest } => {
                    h.u8(1);
                    h.rect(*dest);
                }
                DrawOp::GlyphRun(run) => {
                    h.u8(2);
                    h.f64(run.origin.x);
                    h.f64(run.origin.y);
                    h.u32(run.size_px);
                    h.color(run.color);
                    h.u64(run.glyphs.len() as u64);
                    for g in &run.glyphs {
                        h.u32(u32::from(g.ch));
                        h.f32(g.x);
                    }
                }
            }
        }
        h.finish()
    }

    /// Glyph runs in draw order.
    pub fn glyph_runs(&self) -> impl Iterator<Item = &GlyphRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::GlyphRun(run) => Some(run),
            _ => None,
        })
    }

    /// First glyph run with `role`.
    pub fn run(&self, role: RunRole) -> Option<&GlyphRun> {
        self.glyph_runs().find(|r| r.role == role)
    }
}

struct PairHasher {
    a: Fnv1a64,
    b: Fnv1a64,
}

impl PairHasher {
    fn new() -> Self {
        Self {
            a: Fnv1a64::new_default(),
            b: Fnv1a64::new(0x9ae1_6a3b_2f90_404f),
        }
    }

    fn u8(&mut self, v: u8) {
        self.a.write_u8(v);
        self.b.write_u8(v);
    }

    fn u32(&mut self, v: u32) {
        self.a.write_u32(v);
        self.b.write_u32(v);
    }

    fn u64(&mut self, v: u64) {
        self.a.write_u64(v);
        self.b.write_u64(v);
    }

    fn f32(&mut self, v: f32) {
        self.a.write_f32(v);
        self.b.write_f32(v);
    }

    fn f64(&mut self, v: f64) {
        self.a.write_f64(v);
        self.b.write_f64(v);
    }

    fn rect(&mut self, r: Rect) {
        for v in [r.x0, r.y0, r.x1, r.y1] {
            self.f64(v);
        }
    }

    fn color(&mut self, c: ColorDef) {
        for v in [c.r, c.g, c.b, c.a] {
            self.u8(v);
        }
    }

    fn finish(self) -> PlanFingerprint {
        PlanFingerprint {
            hi: self.a.finish(),
            lo: self.b.finish(),
        }
    }
}
