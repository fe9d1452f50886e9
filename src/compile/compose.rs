use crate::{
    assets::color::ColorDef,
    assets::store::PreparedAssets,
    compile::plan::{DrawOp, FittedRow, GlyphRun, PosterPlan, RunRole},
    fit::fitter::{FittedText, fit_text},
    foundation::core::{Canvas, Point, Rect},
    foundation::error::{PosterError, PosterResult},
    poster::{layout::PosterLayout, rank::rank_marker, spec::PosterSpec},
    text::face::FontFace,
    text::normalize::display_title,
};

/// Base size decrement used when the rows do not fit the list band.
const BAND_GUARD_STEP_PX: u32 = 2;

/// Compose the drawing instructions for a poster.
///
/// Pure: the same spec, layout and assets always give the same plan. Draw order is backdrop,
/// background, rows (marker then title), signature.
#[tracing::instrument(
    skip_all,
    fields(rows = spec.entries().len(), signature = spec.signature().is_some())
)]
pub fn compose_poster(
    spec: &PosterSpec,
    layout: &PosterLayout,
    assets: &PreparedAssets,
) -> PosterResult<PosterPlan> {
    layout.validate()?;
    if spec.entries().len() > layout.max_rows {
        return Err(PosterError::validation(format!(
            "poster holds at most {} rows, got {}",
            layout.max_rows,
            spec.entries().len()
        )));
    }

    let face = assets.face();
    let canvas = layout.canvas;
    let bg = assets.background();

    let mut ops = vec![
        DrawOp::Fill {
            rect: canvas.rect(),
            color: layout.backdrop,
        },
        DrawOp::Background {
            dest: cover_rect(bg.width, bg.height, canvas),
        },
    ];

    let titles: Vec<String> = spec.entries().iter().map(|t| display_title(t)).collect();
    let rows = fit_rows(face, layout, &titles)?;

    let mut fitted_rows = Vec::with_capacity(rows.len());
    for row in rows {
        ops.push(DrawOp::GlyphRun(row.marker_run));
        ops.push(DrawOp::GlyphRun(row.title_run));
        fitted_rows.push(row.fitted);
    }

    if let Some(signature) = spec.signature() {
        ops.push(DrawOp::GlyphRun(signature_run(face, layout, signature)?));
    }

    warn_missing_glyphs(face, &ops);

    Ok(PosterPlan {
        canvas,
        ops,
        rows: fitted_rows,
    })
}

/// Destination rect that scales an image to cover the canvas, centered (CSS `center/cover`).
pub fn cover_rect(image_w: u32, image_h: u32, canvas: Canvas) -> Rect {
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    if image_w == 0 || image_h == 0 {
        return canvas.rect();
    }
    let (iw, ih) = (f64::from(image_w), f64::from(image_h));
    let k = (cw / iw).max(ch / ih);
    let (w, h) = (iw * k, ih * k);
    let x0 = (cw - w) * 0.5;
    let y0 = (ch - h) * 0.5;
    Rect::new(x0, y0, x0 + w, y0 + h)
}

struct ComposedRow {
    fitted: FittedRow,
    marker_run: GlyphRun,
    title_run: GlyphRun,
}

struct RowFit {
    marker: String,
    marker_fit: FittedText,
    title: String,
    title_fit: FittedText,
    height: f32,
}

fn fit_rows(
    face: &dyn FontFace,
    layout: &PosterLayout,
    titles: &[String],
) -> PosterResult<Vec<ComposedRow>> {
    if titles.is_empty() {
        return Ok(Vec::new());
    }

    let title_col = layout.title_column();
    let marker_col = layout.marker_column();
    let (band_top, band_bottom) = layout.list_band();
    let nominal = layout.base_size_for(titles.len());
    let mut base = nominal;

    let fits = loop {
        let mut fits = Vec::with_capacity(titles.len());
        for (i, title) in titles.iter().enumerate() {
            let marker = rank_marker(layout.marker.style, i);
            let marker_fit = fit_text(face, &marker, marker_col.width(), &layout.marker_fit())?;
            let title_fit = fit_text(face, title, title_col.width(), &layout.title_fit(base))?;
            let height = row_height(layout, &title_fit, &marker_fit);
            fits.push(RowFit {
                marker,
                marker_fit,
                title: title.clone(),
                title_fit,
                height,
            });
        }

        let stack: f32 = fits.iter().map(|f| f.height).sum::<f32>()
            + layout.row_gap * (fits.len() - 1) as f32;
        let overflows = band_top + stack > band_bottom;
        if !overflows || !layout.band_guard || base <= layout.title.min_px {
            if overflows {
                tracing::warn!(
                    stack,
                    band = band_bottom - band_top,
                    base,
                    "rows overflow the list band"
                );
            }
            break fits;
        }
        base = base
            .saturating_sub(BAND_GUARD_STEP_PX)
            .max(layout.title.min_px);
    };
    if base != nominal {
        tracing::warn!(nominal, base, "base title size lowered to fit the list band");
    }

    let mut out = Vec::with_capacity(fits.len());
    let mut y = band_top;
    for (index, fit) in fits.into_iter().enumerate() {
        let top = y;
        y += fit.height + layout.row_gap;

        let m = &fit.marker_fit;
        let marker_left = if m.truncated {
            marker_col.left
        } else {
            marker_col.right - m.line.width
        };
        let marker_baseline = face
            .line_metrics(m.font_size as f32)
            .baseline_in_box(top, fit.height);

        let t = &fit.title_fit;
        let title_left = if t.truncated {
            title_col.left
        } else {
            title_col.left + (title_col.width() - t.line.width) * 0.5
        };
        let title_baseline = face
            .line_metrics(t.font_size as f32)
            .baseline_in_box(top, fit.height);

        out.push(ComposedRow {
            fitted: FittedRow {
                index,
                marker: fit.marker.clone(),
                marker_size: m.font_size,
                title: fit.title.clone(),
                font_size: t.font_size,
                truncated: t.truncated,
                top,
                height: fit.height,
                text_left: title_left,
                text_right: title_left + t.line.width,
            },
            marker_run: run(
                RunRole::RankMarker { row: index },
                marker_left,
                marker_baseline,
                m,
                layout.ink,
            ),
            title_run: run(
                RunRole::Title { row: index },
                title_left,
                title_baseline,
                t,
                layout.ink,
            ),
        });
    }
    Ok(out)
}

/// Row height: the taller of the title and marker line boxes, rounded up to whole px.
fn row_height(layout: &PosterLayout, title: &FittedText, marker: &FittedText) -> f32 {
    let title_box = (title.font_size as f32 * layout.title.line_height).ceil();
    let marker_box = (marker.font_size as f32 * layout.marker.line_height).ceil();
    title_box.max(marker_box)
}

fn signature_run(
    face: &dyn FontFace,
    layout: &PosterLayout,
    signature: &str,
) -> PosterResult<GlyphRun> {
    let w = layout.canvas.width as f32;
    let h = layout.canvas.height as f32;
    let right = w - layout.signature.right;
    let avail = (right - layout.margin_left).max(0.0);
    let fit = fit_text(face, signature, avail, &layout.signature_fit())?;

    let metrics = face.line_metrics(fit.font_size as f32);
    let baseline = h - layout.signature.bottom - metrics.descent;
    Ok(run(
        RunRole::Signature,
        right - fit.line.width,
        baseline,
        &fit,
        layout.ink,
    ))
}

fn run(role: RunRole, left: f32, baseline: f32, fit: &FittedText, color: ColorDef) -> GlyphRun {
    GlyphRun {
        role,
        origin: Point::new(f64::from(left), f64::from(baseline)),
        size_px: fit.font_size,
        color,
        glyphs: fit.line.glyphs.clone(),
        width: fit.line.width,
    }
}

fn warn_missing_glyphs(face: &dyn FontFace, ops: &[DrawOp]) {
    let mut missing: Vec<char> = Vec::new();
    for op in ops {
        let DrawOp::GlyphRun(run) = op else { continue };
        for g in &run.glyphs {
            if !g.ch.is_whitespace() && !face.has_glyph(g.ch) && !missing.contains(&g.ch) {
                missing.push(g.ch);
            }
        }
    }
    if !missing.is_empty() {
        let chars: String = missing.into_iter().collect();
        tracing::warn!(
            family = face.family_name(),
            chars = %chars,
            "font has no glyph for some characters; they render as the font's fallback box"
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compose.rs"]
mod tests;
