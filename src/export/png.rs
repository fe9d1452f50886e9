use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, TimeZone};
use image::ImageEncoder;

use crate::{
    assets::store::PreparedAssets,
    compile::plan::{PlanFingerprint, PosterPlan},
    foundation::error::{PosterError, PosterResult},
    render::{backend::execute_plan, cpu::CpuBackend},
};

/// Pixel size of the exported PNG.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSize {
    /// Render at `render_scale`, then resample to the canvas size (1080x1920 by default).
    #[default]
    Canvas,
    /// Keep the `render_scale` resolution.
    Rendered,
}

/// How the poster is rasterized and named on export.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Device px per canvas unit while rasterizing.
    pub render_scale: f64,
    /// Pixel size of the encoded PNG.
    pub output: OutputSize,
    /// File names are `<prefix>-<YYYYmmdd-HHMMSS>.png`.
    pub file_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            render_scale: 3.0,
            output: OutputSize::Canvas,
            file_prefix: "lux-ranking".to_string(),
        }
    }
}

impl ExportSettings {
    /// Reject non-positive scales and prefixes that are empty or contain path separators.
    pub fn validate(&self) -> PosterResult<()> {
        if !self.render_scale.is_finite() || self.render_scale <= 0.0 {
            return Err(PosterError::validation(
                "export render_scale must be finite and > 0",
            ));
        }
        let prefix = self.file_prefix.trim();
        if prefix.is_empty() {
            return Err(PosterError::validation("export file_prefix must be non-empty"));
        }
        if prefix.contains(['/', '\\']) {
            return Err(PosterError::validation(
                "export file_prefix must not contain path separators",
            ));
        }
        Ok(())
    }
}

/// An encoded poster, ready to be downloaded or written.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    /// Suggested download name.
    pub file_name: String,
    /// PNG width in px.
    pub width: u32,
    /// PNG height in px.
    pub height: u32,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
    /// Plan the pixels were rendered from.
    pub plan_fingerprint: PlanFingerprint,
}

impl ExportArtifact {
    /// Write the PNG into `dir` under [`ExportArtifact::file_name`]. Creates `dir` if needed.
    pub fn write_to_dir(&self, dir: &Path) -> PosterResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = self.png.len(), "poster written");
        Ok(path)
    }
}

/// Rasterize `plan` for download.
///
/// The plan is rendered at `settings.render_scale` with the same backend the preview uses, then
/// (for [`OutputSize::Canvas`]) resampled with a Lanczos3 filter to the canvas size.
#[tracing::instrument(skip_all, fields(scale = settings.render_scale, output = ?settings.output))]
pub fn export_poster<Tz>(
    plan: &PosterPlan,
    assets: &PreparedAssets,
    settings: &ExportSettings,
    timestamp: &DateTime<Tz>,
) -> PosterResult<ExportArtifact>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    settings.validate()?;

    let mut backend = CpuBackend::new();
    let frame = execute_plan(&mut backend, plan, assets, settings.render_scale)?;
    let rendered = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_rgba8())
        .ok_or_else(|| PosterError::render("frame buffer does not match its size"))?;

    let (cw, ch) = (plan.canvas.width, plan.canvas.height);
    let img = match settings.output {
        OutputSize::Canvas if (rendered.width(), rendered.height()) != (cw, ch) => {
            image::imageops::resize(&rendered, cw, ch, image::imageops::FilterType::Lanczos3)
        }
        _ => rendered,
    };

    let png = encode_png(&img)?;
    let file_name = export_file_name(settings.file_prefix.trim(), timestamp);
    let fingerprint = plan.fingerprint();
    tracing::info!(
        file_name = %file_name,
        width = img.width(),
        height = img.height(),
        bytes = png.len(),
        %fingerprint,
        "poster exported"
    );

    Ok(ExportArtifact {
        file_name,
        width: img.width(),
        height: img.height(),
        png,
        plan_fingerprint: fingerprint,
    })
}

/// Encode straight-alpha RGBA8 pixels as PNG.
pub fn encode_png(img: &image::RgbaImage) -> PosterResult<Vec<u8>> {
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .context("encode png")?;
    Ok(out)
}

/// `<prefix>-<YYYYmmdd-HHMMSS>.png` in the timestamp's own timezone.
pub fn export_file_name<Tz>(prefix: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{prefix}-{}.png", timestamp.format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
