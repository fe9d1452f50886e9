use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::store::{PreparedAssets, PreparedImage},
    compile::plan::{DrawOp, GlyphRun},
    foundation::core::{Affine, Canvas, Rect, Rgba8Premul},
    foundation::error::{PosterError, PosterResult},
    render::backend::{FrameRGBA, PlanBackend},
};

// Glyph sprites are cheap to rebuild; keep the cache from growing without bound across sizes.
const GLYPH_CACHE_LIMIT: usize = 4096;

/// Plan backend rendering on the CPU with `vello_cpu`.
///
/// Rectangles and the background go through vello's rasterizer; glyphs are rasterized by the font
/// face at device size and blitted as premultiplied image paints on whole-pixel positions.
pub struct CpuBackend {
    frame: Option<CpuFrame>,
    background_cache: Option<(BackgroundKey, vello_cpu::Image)>,
    glyph_cache: HashMap<GlyphKey, Option<GlyphSprite>>,
}

struct CpuFrame {
    width: u16,
    height: u16,
    scale: f64,
    ctx: vello_cpu::RenderContext,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BackgroundKey {
    bytes: usize,
    width: u32,
    height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GlyphKey {
    ch: char,
    size_bits: u32,
    ink: Rgba8Premul,
}

#[derive(Clone)]
struct GlyphSprite {
    paint: vello_cpu::Image,
    width: f64,
    height: f64,
    left: i32,
    top: i32,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    /// Backend with empty caches.
    pub fn new() -> Self {
        Self {
            frame: None,
            background_cache: None,
            glyph_cache: HashMap::new(),
        }
    }

    /// Drop cached paints, e.g. after the assets were reloaded.
    pub fn clear_caches(&mut self) {
        self.background_cache = None;
        self.glyph_cache.clear();
    }
}

impl PlanBackend for CpuBackend {
    fn begin(&mut self, canvas: Canvas, scale: f64) -> PosterResult<()> {
        let (w, h) = canvas.scaled_size(scale)?;
        let width: u16 = w
            .try_into()
            .map_err(|_| PosterError::render("surface width exceeds u16"))?;
        let height: u16 = h
            .try_into()
            .map_err(|_| PosterError::render("surface height exceeds u16"))?;
        self.frame = Some(CpuFrame {
            width,
            height,
            scale,
            ctx: vello_cpu::RenderContext::new(width, height),
        });
        Ok(())
    }

    fn exec_op(&mut self, op: &DrawOp, assets: &PreparedAssets) -> PosterResult<()> {
        let mut frame = self
            .frame
            .take()
            .ok_or_else(|| PosterError::render("exec_op called before begin"))?;
        let res = self.draw_op(&mut frame, op, assets);
        self.frame = Some(frame);
        res
    }

    fn finish(&mut self) -> PosterResult<FrameRGBA> {
        let mut frame = self
            .frame
            .take()
            .ok_or_else(|| PosterError::render("finish called before begin"))?;
        frame.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(frame.width, frame.height);
        frame.ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: u32::from(frame.width),
            height: u32::from(frame.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl CpuBackend {
    fn draw_op(
        &mut self,
        frame: &mut CpuFrame,
        op: &DrawOp,
        assets: &PreparedAssets,
    ) -> PosterResult<()> {
        let ctx = &mut frame.ctx;
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let to_device = Affine::scale(frame.scale);

        match op {
            DrawOp::Fill { rect, color } => {
                ctx.set_transform(affine_to_cpu(to_device));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    color.r, color.g, color.b, color.a,
                ));
                ctx.fill_rect(&rect_to_cpu(*rect));
                Ok(())
            }
            DrawOp::Background { dest } => {
                let bg = assets.background();
                let paint = self.background_paint(bg)?;
                let (iw, ih) = (f64::from(bg.width), f64::from(bg.height));
                let place = Affine::translate((dest.x0, dest.y0))
                    * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);

                ctx.set_transform(affine_to_cpu(to_device * place));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
                Ok(())
            }
            DrawOp::GlyphRun(run) => self.draw_glyph_run(frame, run, assets),
        }
    }

    fn draw_glyph_run(
        &mut self,
        frame: &mut CpuFrame,
        run: &GlyphRun,
        assets: &PreparedAssets,
    ) -> PosterResult<()> {
        let face = assets.face();
        let size = (f64::from(run.size_px) * frame.scale) as f32;
        let ink = run.color.to_rgba8_premul();
        let baseline = run.origin.y * frame.scale;

        if self.glyph_cache.len() > GLYPH_CACHE_LIMIT {
            self.glyph_cache.clear();
        }

        for g in &run.glyphs {
            let key = GlyphKey {
                ch: g.ch,
                size_bits: size.to_bits(),
                ink,
            };
            let sprite = match self.glyph_cache.get(&key) {
                Some(s) => s.clone(),
                None => {
                    let s = glyph_sprite(face.rasterize(g.ch, size), ink)?;
                    self.glyph_cache.insert(key, s.clone());
                    s
                }
            };
            let Some(sprite) = sprite else { continue };

            let pen_x = (run.origin.x + f64::from(g.x)) * frame.scale;
            let x = (pen_x + f64::from(sprite.left)).round();
            let y = (baseline - f64::from(sprite.top)).round();

            let ctx = &mut frame.ctx;
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
            ctx.set_paint(sprite.paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                sprite.width,
                sprite.height,
            ));
        }
        Ok(())
    }

    fn background_paint(&mut self, bg: &PreparedImage) -> PosterResult<vello_cpu::Image> {
        let key = BackgroundKey {
            bytes: Arc::as_ptr(&bg.rgba8_premul) as usize,
            width: bg.width,
            height: bg.height,
        };
        if let Some((cached, paint)) = &self.background_cache
            && *cached == key
        {
            return Ok(paint.clone());
        }

        let pixmap = image_premul_bytes_to_pixmap(&bg.rgba8_premul, bg.width, bg.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.background_cache = Some((key, paint.clone()));
        Ok(paint)
    }
}

fn glyph_sprite(
    mask: crate::text::face::GlyphMask,
    ink: Rgba8Premul,
) -> PosterResult<Option<GlyphSprite>> {
    if mask.is_empty() {
        return Ok(None);
    }
    let mut rgba = Vec::with_capacity(mask.coverage.len() * 4);
    for &c in &mask.coverage {
        let px = ink.with_coverage(c);
        rgba.extend_from_slice(&[px.r, px.g, px.b, px.a]);
    }
    let pixmap = image_premul_bytes_to_pixmap(&rgba, mask.width, mask.height)?;
    Ok(Some(GlyphSprite {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        width: f64::from(mask.width),
        height: f64::from(mask.height),
        left: mask.left,
        top: mask.top,
    }))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PosterResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosterError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosterError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PosterError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
