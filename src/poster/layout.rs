use crate::{
    assets::color::ColorDef,
    fit::fitter::{FitParams, SAFETY_MARGIN},
    foundation::core::Canvas,
    foundation::error::{PosterError, PosterResult},
    poster::{catalog::DEFAULT_LIMIT, rank::RankStyle},
};

/// Every constant the poster composer reads, in canvas units (px at 1080x1920).
///
/// Passed explicitly to composition; nothing is read from globals. Every field has a default, so a
/// JSON config only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PosterLayout {
    /// Canvas size the layout is drawn on.
    pub canvas: Canvas,
    /// Distance from the top edge to the first row.
    pub list_top: f32,
    /// Space kept free below the last row.
    pub list_bottom: f32,
    /// Left edge of the marker column.
    pub margin_left: f32,
    /// Space kept free right of every title.
    pub margin_right: f32,
    /// Width of the rank-marker column.
    pub marker_column: f32,
    /// Gap between the marker's right edge and the end of its column.
    pub marker_padding_right: f32,
    /// Horizontal gap between marker column and title column.
    pub column_gap: f32,
    /// Vertical gap between rows.
    pub row_gap: f32,
    /// Most rows a poster holds.
    pub max_rows: usize,
    /// Share of a column a fitted line may use.
    pub safety_margin: f32,
    /// Lower the base title size in 2 px steps until the rows fit the list band. Off by default:
    /// rows keep the base-size steps and may run past `list_bottom`.
    pub band_guard: bool,
    /// Text color.
    pub ink: ColorDef,
    /// Solid fill under the background art, visible through transparent pixels.
    pub backdrop: ColorDef,
    /// Title fitting.
    pub title: TitleStyle,
    /// Rank markers.
    pub marker: MarkerStyle,
    /// Signature line.
    pub signature: SignatureStyle,
    /// Starting title size by row count.
    pub base_sizes: BaseSizeSteps,
}

/// Title fitting constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TitleStyle {
    /// Smallest title size; titles that still overflow are truncated.
    pub min_px: u32,
    /// Letter spacing in em.
    pub tracking_em: f32,
    /// Row height as a multiple of the fitted font size.
    pub line_height: f32,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            min_px: 40,
            tracking_em: 0.22,
            line_height: 1.05,
        }
    }
}

/// Rank marker constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Nominal marker size in px.
    pub size_px: u32,
    /// Letter spacing in em.
    pub tracking_em: f32,
    /// Row height as a multiple of the marker size.
    pub line_height: f32,
    /// Numeral style.
    pub style: RankStyle,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            size_px: 40,
            tracking_em: 0.1,
            line_height: 1.15,
            style: RankStyle::Roman,
        }
    }
}

/// Signature constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SignatureStyle {
    /// Nominal signature size in px.
    pub size_px: u32,
    /// Letter spacing in em.
    pub tracking_em: f32,
    /// Distance from the right edge to the signature's right end.
    pub right: f32,
    /// Distance from the bottom edge to the signature's line box bottom.
    pub bottom: f32,
}

impl Default for SignatureStyle {
    fn default() -> Self {
        Self {
            size_px: 28,
            tracking_em: 0.0,
            right: 88.0,
            bottom: 120.0,
        }
    }
}

/// One step of the base-size function: lists of up to `max_rows` rows start at `size_px`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BaseSizeStep {
    /// Largest row count this step covers.
    pub max_rows: usize,
    /// Title size for those lists.
    pub size_px: u32,
}

/// Maximum title size as a step function of the number of rows. Longer lists start smaller.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BaseSizeSteps {
    /// Sorted by `max_rows`; the first step that admits the row count wins.
    pub steps: Vec<BaseSizeStep>,
    /// Used when no step admits the row count.
    pub otherwise_px: u32,
}

impl Default for BaseSizeSteps {
    fn default() -> Self {
        Self {
            steps: vec![
                BaseSizeStep {
                    max_rows: 5,
                    size_px: 104,
                },
                BaseSizeStep {
                    max_rows: 6,
                    size_px: 96,
                },
                BaseSizeStep {
                    max_rows: 7,
                    size_px: 90,
                },
            ],
            otherwise_px: 84,
        }
    }
}

impl BaseSizeSteps {
    /// Base size for a list of `rows` rows.
    pub fn size_for(&self, rows: usize) -> u32 {
        self.steps
            .iter()
            .find(|s| rows <= s.max_rows)
            .map_or(self.otherwise_px, |s| s.size_px)
    }
}

impl Default for PosterLayout {
    fn default() -> Self {
        Self {
            canvas: Canvas::STORY,
            list_top: 620.0,
            list_bottom: 220.0,
            margin_left: 84.0,
            margin_right: 84.0,
            marker_column: 96.0,
            marker_padding_right: 8.0,
            column_gap: 20.0,
            row_gap: 22.0,
            max_rows: DEFAULT_LIMIT,
            safety_margin: SAFETY_MARGIN,
            band_guard: false,
            ink: ColorDef::rgb(0x11, 0x11, 0x11),
            backdrop: ColorDef::rgb(0x0a, 0x12, 0x40),
            title: TitleStyle::default(),
            marker: MarkerStyle::default(),
            signature: SignatureStyle::default(),
            base_sizes: BaseSizeSteps::default(),
        }
    }
}

/// Horizontal span `[left, right)` in canvas units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    /// Left edge in canvas units.
    pub left: f32,
    /// Right edge in canvas units.
    pub right: f32,
}

impl Column {
    /// Width, never negative.
    pub fn width(self) -> f32 {
        (self.right - self.left).max(0.0)
    }
}

impl PosterLayout {
    /// Starting title size for a list of `rows` rows.
    pub fn base_size_for(&self, rows: usize) -> u32 {
        self.base_sizes.size_for(rows)
    }

    /// Where rank markers are right-aligned.
    pub fn marker_column(&self) -> Column {
        Column {
            left: self.margin_left,
            right: self.margin_left + self.marker_column - self.marker_padding_right,
        }
    }

    /// Where titles are fitted and centered.
    pub fn title_column(&self) -> Column {
        Column {
            left: self.margin_left + self.marker_column + self.column_gap,
            right: self.canvas.width as f32 - self.margin_right,
        }
    }

    /// Vertical band rows must stay inside: `[list_top, H - list_bottom]`.
    pub fn list_band(&self) -> (f32, f32) {
        (self.list_top, self.canvas.height as f32 - self.list_bottom)
    }

    /// Fit parameters for a title whose size starts at `base_px`.
    pub fn title_fit(&self, base_px: u32) -> FitParams {
        FitParams {
            min_px: self.title.min_px.min(base_px),
            max_px: base_px,
            tracking_em: self.title.tracking_em,
            safety_margin: self.safety_margin,
        }
    }

    /// Fit parameters for rank markers: nominal size, shrinking to half when the column is tight.
    pub fn marker_fit(&self) -> FitParams {
        FitParams {
            min_px: (self.marker.size_px / 2).max(1),
            max_px: self.marker.size_px,
            tracking_em: self.marker.tracking_em,
            safety_margin: self.safety_margin,
        }
    }

    /// Fit parameters for the signature, shrinking to half size between the margins.
    pub fn signature_fit(&self) -> FitParams {
        FitParams {
            min_px: (self.signature.size_px / 2).max(1),
            max_px: self.signature.size_px,
            tracking_em: self.signature.tracking_em,
            safety_margin: self.safety_margin,
        }
    }

    /// Check lengths, columns and styles for consistency.
    pub fn validate(&self) -> PosterResult<()> {
        let w = self.canvas.width as f32;
        let h = self.canvas.height as f32;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PosterError::validation("canvas width/height must be > 0"));
        }

        let lengths = [
            ("list_top", self.list_top),
            ("list_bottom", self.list_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("marker_column", self.marker_column),
            ("marker_padding_right", self.marker_padding_right),
            ("column_gap", self.column_gap),
            ("row_gap", self.row_gap),
            ("signature.right", self.signature.right),
            ("signature.bottom", self.signature.bottom),
        ];
        for (name, v) in lengths {
            if !v.is_finite() || v < 0.0 {
                return Err(PosterError::validation(format!(
                    "layout {name} must be finite and >= 0, got {v}"
                )));
            }
        }

        if self.list_top + self.list_bottom >= h {
            return Err(PosterError::validation(
                "list_top + list_bottom leaves no room for rows",
            ));
        }
        if self.title_column().width() <= 0.0 {
            return Err(PosterError::validation(
                "margins and marker column leave no room for titles",
            ));
        }
        if self.marker_padding_right > self.marker_column {
            return Err(PosterError::validation(
                "marker_padding_right must not exceed marker_column",
            ));
        }
        if self.signature.right >= w || self.signature.bottom >= h {
            return Err(PosterError::validation("signature anchor lies off canvas"));
        }
        for (name, lh) in [
            ("title.line_height", self.title.line_height),
            ("marker.line_height", self.marker.line_height),
        ] {
            if !lh.is_finite() || lh <= 0.0 {
                return Err(PosterError::validation(format!(
                    "layout {name} must be finite and > 0"
                )));
            }
        }
        if self.max_rows == 0 {
            return Err(PosterError::validation("max_rows must be >= 1"));
        }
        if self.marker.size_px == 0 || self.signature.size_px == 0 {
            return Err(PosterError::validation(
                "marker and signature sizes must be >= 1",
            ));
        }

        let mut prev_rows = 0;
        for step in &self.base_sizes.steps {
            if step.max_rows < prev_rows {
                return Err(PosterError::validation(
                    "base size steps must be sorted by max_rows",
                ));
            }
            prev_rows = step.max_rows;
        }
        let sizes = self
            .base_sizes
            .steps
            .iter()
            .map(|s| s.size_px)
            .chain([self.base_sizes.otherwise_px]);
        for size in sizes {
            if size < self.title.min_px {
                return Err(PosterError::validation(format!(
                    "base size {size} is below the title minimum {}",
                    self.title.min_px
                )));
            }
        }

        self.title_fit(self.base_size_for(1)).validate()?;
        self.marker_fit().validate()?;
        self.signature_fit().validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poster/layout.rs"]
mod tests;
