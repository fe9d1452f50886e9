use crate::{
    assets::store::PreparedAssets,
    compile::plan::{DrawOp, PosterPlan},
    foundation::core::Canvas,
    foundation::error::{PosterError, PosterResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Rendered pixels, row-major RGBA8.
pub struct FrameRGBA {
    /// Width in px.
    pub width: u32,
    /// Height in px.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
    /// Color channels are multiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA of the pixel at `(x, y)`, as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(i..i + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixels, as PNG encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// A target that can execute a [`PosterPlan`] at some scale.
///
/// `begin` sizes the surface for `canvas * scale`, ops are executed in order, `finish` reads the
/// pixels back. Backends may keep caches between plans.
pub trait PlanBackend {
    fn begin(&mut self, canvas: Canvas, scale: f64) -> PosterResult<()>;

    fn exec_op(&mut self, op: &DrawOp, assets: &PreparedAssets) -> PosterResult<()>;

    fn finish(&mut self) -> PosterResult<FrameRGBA>;
}

/// Render `plan` at `scale` (device px per canvas unit).
pub fn execute_plan<B: PlanBackend + ?Sized>(
    backend: &mut B,
    plan: &PosterPlan,
    assets: &PreparedAssets,
    scale: f64,
) -> PosterResult<FrameRGBA> {
    backend.begin(plan.canvas, scale)?;
    for op in &plan.ops {
        backend.exec_op(op, assets)?;
    }
    let frame = backend.finish()?;

    let (w, h) = plan.canvas.scaled_size(scale)?;
    if frame.width != w || frame.height != h {
        return Err(PosterError::render(format!(
            "backend produced {}x{}, expected {w}x{h}",
            frame.width, frame.height
        )));
    }
    Ok(frame)
}
