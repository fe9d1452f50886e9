use std::sync::Arc;

use crate::{
    assets::store::PreparedAssets,
    compile::plan::{PlanFingerprint, PosterPlan},
    foundation::core::Canvas,
    foundation::error::{PosterError, PosterResult},
    render::{
        backend::{FrameRGBA, execute_plan},
        cpu::CpuBackend,
    },
};

/// Default preview scale: a 1080 px canvas shown about 389 px wide.
pub const DEFAULT_PREVIEW_SCALE: f64 = 0.36;

/// Live preview of a poster at viewport scale.
///
/// Executes the same plans as export through the same backend. The last frame is kept and reused
/// while neither the plan nor the scale changes.
pub struct PreviewSurface {
    scale: f64,
    backend: CpuBackend,
    cached: Option<CachedFrame>,
}

struct CachedFrame {
    fingerprint: PlanFingerprint,
    scale_bits: u64,
    frame: Arc<FrameRGBA>,
}

impl std::fmt::Debug for PreviewSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSurface")
            .field("scale", &self.scale)
            .field("cached", &self.cached.as_ref().map(|c| c.fingerprint))
            .finish()
    }
}

impl PreviewSurface {
    /// Surface at a fixed scale.
    pub fn new(scale: f64) -> PosterResult<Self> {
        validate_scale(scale)?;
        Ok(Self {
            scale,
            backend: CpuBackend::new(),
            cached: None,
        })
    }

    /// Current preview px per canvas unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Change the scale; the next `present` re-renders.
    pub fn set_scale(&mut self, scale: f64) -> PosterResult<()> {
        validate_scale(scale)?;
        self.scale = scale;
        Ok(())
    }

    /// Fit the preview to a viewport `viewport_width` px wide.
    pub fn resize(&mut self, viewport_width: u32, canvas: Canvas) -> PosterResult<()> {
        if viewport_width == 0 || canvas.width == 0 {
            return Err(PosterError::validation("viewport and canvas width must be > 0"));
        }
        self.set_scale(f64::from(viewport_width) / f64::from(canvas.width))
    }

    /// Fingerprint of the plan the current frame was rendered from.
    pub fn presented_fingerprint(&self) -> Option<PlanFingerprint> {
        self.cached.as_ref().map(|c| c.fingerprint)
    }

    /// Forget the cached frame and backend caches. Needed after assets change, since the plan
    /// fingerprint does not cover asset pixels.
    pub fn invalidate(&mut self) {
        self.cached = None;
        self.backend.clear_caches();
    }

    /// Frame for `plan` at the current scale, rendering only when plan or scale changed.
    pub fn present(
        &mut self,
        plan: &PosterPlan,
        assets: &PreparedAssets,
    ) -> PosterResult<Arc<FrameRGBA>> {
        let fingerprint = plan.fingerprint();
        let scale_bits = self.scale.to_bits();
        if let Some(c) = &self.cached
            && c.fingerprint == fingerprint
            && c.scale_bits == scale_bits
        {
            tracing::debug!(%fingerprint, "preview cache hit");
            return Ok(c.frame.clone());
        }

        let frame = Arc::new(execute_plan(&mut self.backend, plan, assets, self.scale)?);
        tracing::debug!(
            %fingerprint,
            width = frame.width,
            height = frame.height,
            "preview rendered"
        );
        self.cached = Some(CachedFrame {
            fingerprint,
            scale_bits,
            frame: frame.clone(),
        });
        Ok(frame)
    }
}

fn validate_scale(scale: f64) -> PosterResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(PosterError::validation("preview scale must be finite and > 0"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
