use crate::{
    foundation::error::{PosterError, PosterResult},
    text::face::FontFace,
    text::measure::{GlyphLine, layout_glyphs, measure_width},
};

/// Fraction of the available width a fitted line may use. Leaves room for rasterization rounding
/// so the last glyph is never clipped.
pub const SAFETY_MARGIN: f32 = 0.985;

/// Bounds and spacing for fitting one line of text.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitParams {
    /// Smallest allowed font size in px. Text that does not fit at this size is truncated.
    pub min_px: u32,
    /// Largest allowed font size in px.
    pub max_px: u32,
    /// Extra space between characters as a fraction of the font size.
    pub tracking_em: f32,
    /// Fraction of the available width the text may occupy.
    pub safety_margin: f32,
}

impl FitParams {
    /// Parameters with the default safety margin.
    pub fn new(min_px: u32, max_px: u32, tracking_em: f32) -> Self {
        Self {
            min_px,
            max_px,
            tracking_em,
            safety_margin: SAFETY_MARGIN,
        }
    }

    /// Reject empty or inverted ranges, negative tracking and margins outside (0, 1].
    pub fn validate(&self) -> PosterResult<()> {
        if self.min_px == 0 {
            return Err(PosterError::validation("fit min_px must be >= 1"));
        }
        if self.min_px > self.max_px {
            return Err(PosterError::validation(format!(
                "fit min_px ({}) must be <= max_px ({})",
                self.min_px, self.max_px
            )));
        }
        if !self.tracking_em.is_finite() || self.tracking_em < 0.0 {
            return Err(PosterError::validation(
                "fit tracking_em must be finite and >= 0",
            ));
        }
        if !self.safety_margin.is_finite() || self.safety_margin <= 0.0 || self.safety_margin > 1.0
        {
            return Err(PosterError::validation(
                "fit safety_margin must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// Result of fitting one line.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedText {
    /// Chosen size in px, within `[min_px, max_px]`.
    pub font_size: u32,
    /// Glyphs to draw at `font_size`, already truncated when needed.
    pub line: GlyphLine,
    /// The text did not fit even at `min_px` and lost trailing characters.
    pub truncated: bool,
}

/// Largest integer size in `[min_px, max_px]` whose measured width stays within
/// `avail_width * safety_margin`; `min_px` when nothing fits.
///
/// Binary search over integer sizes, relying on width being non-decreasing in size.
/// `text` is measured as given; see [`fit_text`] for the display-form requirement.
pub fn fit_font_size(
    face: &dyn FontFace,
    text: &str,
    avail_width: f32,
    params: &FitParams,
) -> PosterResult<u32> {
    params.validate()?;
    if !avail_width.is_finite() || avail_width < 0.0 {
        return Err(PosterError::validation(
            "available width must be finite and >= 0",
        ));
    }

    let budget = avail_width * params.safety_margin;
    let (mut lo, mut hi) = (params.min_px, params.max_px);
    let mut best = params.min_px;
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        if measure_width(face, text, mid as f32, params.tracking_em) <= budget {
            best = mid;
            match mid.checked_add(1) {
                Some(next) => lo = next,
                None => break,
            }
        } else {
            // mid >= min_px >= 1
            hi = mid - 1;
        }
    }
    Ok(best)
}

/// Fit `text` and lay out its glyphs at the fitted size.
///
/// When the text overflows even at `min_px`, glyphs are dropped from the end until the line fits
/// the same budget the search used. Never wraps and never goes below `min_px`.
///
/// `text` is measured exactly as given. Titles must already be in display form (see
/// [`display_title`](crate::display_title)): collapsing spaces or uppercasing afterwards would
/// change the width the size was fitted to.
pub fn fit_text(
    face: &dyn FontFace,
    text: &str,
    avail_width: f32,
    params: &FitParams,
) -> PosterResult<FittedText> {
    let font_size = fit_font_size(face, text, avail_width, params)?;
    let budget = avail_width * params.safety_margin;
    let line = layout_glyphs(face, text, font_size as f32, params.tracking_em, None);
    if line.width <= budget {
        return Ok(FittedText {
            font_size,
            line,
            truncated: false,
        });
    }

    let line = layout_glyphs(
        face,
        text,
        font_size as f32,
        params.tracking_em,
        Some(budget),
    );
    tracing::debug!(
        text,
        font_size,
        kept = line.glyphs.len(),
        total = text.chars().count(),
        "title truncated at minimum size"
    );
    Ok(FittedText {
        font_size,
        line,
        truncated: true,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/fit/fitter.rs"]
mod tests;
