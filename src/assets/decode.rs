use std::sync::Arc;

use anyhow::Context;

use crate::{
    PosterResult,
    assets::store::PreparedImage,
    foundation::core::Canvas,
    foundation::error::PosterError,
};

// Avoid pathological allocations for huge SVG viewBoxes.
const MAX_SVG_RASTER_DIM: u32 = 16_384;

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PosterResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(PosterError::asset_load("decoded image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes.
pub fn parse_svg(bytes: &[u8]) -> PosterResult<usvg::Tree> {
    let mut opts = usvg::Options::default();
    opts.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize an SVG background large enough to cover `canvas` rendered at `scale`.
///
/// The aspect ratio of the SVG is kept; cover placement crops it later.
pub fn rasterize_svg_cover(
    tree: &usvg::Tree,
    canvas: Canvas,
    scale: f64,
) -> PosterResult<PreparedImage> {
    let size = tree.size();
    let (tw, th) = (f64::from(size.width()), f64::from(size.height()));
    if !(tw.is_finite() && th.is_finite()) || tw <= 0.0 || th <= 0.0 {
        return Err(PosterError::asset_load("svg has invalid width/height"));
    }

    let (target_w, target_h) = canvas.scaled_size(scale)?;
    let k = (f64::from(target_w) / tw).max(f64::from(target_h) / th);
    let w = (tw * k).ceil().max(1.0) as u32;
    let h = (th * k).ceil().max(1.0) as u32;
    if w > MAX_SVG_RASTER_DIM || h > MAX_SVG_RASTER_DIM {
        return Err(PosterError::asset_load(format!(
            "svg raster size too large: {w}x{h} (max {MAX_SVG_RASTER_DIM}x{MAX_SVG_RASTER_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| PosterError::asset_load("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        (f64::from(w) / tw) as f32,
        (f64::from(h) / th) as f32,
    );
    resvg::render(tree, xform, &mut pixmap.as_mut());

    Ok(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
