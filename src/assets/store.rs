use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode as assets_decode,
    foundation::core::Canvas,
    foundation::error::{PosterError, PosterResult},
    text::face::{FontFace, FontdueFace},
};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Build an image filled with one premultiplied color.
    pub fn solid(width: u32, height: u32, rgba8_premul: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba8_premul);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }
}

/// Where the poster font comes from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FontSource {
    /// A font file (TTF/OTF/TTC), relative to the assets root.
    File {
        /// Path to the font file.
        path: PathBuf,
        /// Face index inside a collection file.
        #[serde(default)]
        index: u32,
    },
    /// System font families tried in order; generic names `serif`, `sans-serif` and
    /// `monospace` are understood.
    System {
        /// Family names, most preferred first.
        families: Vec<String>,
    },
}

impl FontSource {
    /// Load the face on its own, without a background. Relative paths resolve against `root`.
    pub fn load(&self, root: &Path) -> PosterResult<FontdueFace> {
        load_face(self, root)
    }
}

impl Default for FontSource {
    fn default() -> Self {
        Self::System {
            families: vec![
                "Times New Roman".to_string(),
                "Times".to_string(),
                "serif".to_string(),
            ],
        }
    }
}

/// External assets the poster depends on.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AssetSources {
    /// Background art: PNG/JPEG/WebP or SVG.
    pub background: PathBuf,
    /// Font used for titles, rank markers and the signature.
    pub font: FontSource,
}

impl Default for AssetSources {
    fn default() -> Self {
        Self {
            background: PathBuf::from("lux-final-bg.jpg"),
            font: FontSource::default(),
        }
    }
}

/// Assets loaded and decoded up front so composition and rendering stay IO-free.
///
/// A value of this type always carries a decoded background and a usable font face; a failed
/// load never produces a half-prepared store.
#[derive(Clone)]
pub struct PreparedAssets {
    background: PreparedImage,
    face: Arc<dyn FontFace>,
}

impl std::fmt::Debug for PreparedAssets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedAssets")
            .field("background_w", &self.background.width)
            .field("background_h", &self.background.height)
            .field("font_family", &self.face.family_name())
            .finish()
    }
}

impl PreparedAssets {
    /// Load the background and the font described by `sources`.
    ///
    /// Relative paths resolve against `root`. SVG backgrounds are rasterized so they cover
    /// `canvas` at `raster_scale` (the export render scale) without upsampling.
    #[tracing::instrument(skip(sources), fields(background = %sources.background.display()))]
    pub fn prepare(
        sources: &AssetSources,
        root: &Path,
        canvas: Canvas,
        raster_scale: f64,
    ) -> PosterResult<Self> {
        let background = load_background(&sources.background, root, canvas, raster_scale)?;
        let face = load_face(&sources.font, root)?;
        tracing::info!(
            width = background.width,
            height = background.height,
            family = face.family_name(),
            "assets prepared"
        );
        Ok(Self {
            background,
            face: Arc::new(face),
        })
    }

    /// Load only the background and pair it with an already-built face.
    pub fn prepare_with_face(
        background: &Path,
        root: &Path,
        canvas: Canvas,
        raster_scale: f64,
        face: Arc<dyn FontFace>,
    ) -> PosterResult<Self> {
        let background = load_background(background, root, canvas, raster_scale)?;
        Self::from_parts(background, face)
    }

    /// Assemble a store from already-decoded parts.
    pub fn from_parts(background: PreparedImage, face: Arc<dyn FontFace>) -> PosterResult<Self> {
        if background.width == 0 || background.height == 0 {
            return Err(PosterError::asset_load("background image has zero size"));
        }
        if background.rgba8_premul.len()
            != background.width as usize * background.height as usize * 4
        {
            return Err(PosterError::asset_load("background byte length mismatch"));
        }
        Ok(Self { background, face })
    }

    /// Decoded background image.
    pub fn background(&self) -> &PreparedImage {
        &self.background
    }

    /// Face used to measure and draw every run.
    pub fn face(&self) -> &dyn FontFace {
        self.face.as_ref()
    }
}

fn resolve(root: &Path, p: &Path) -> PosterResult<PathBuf> {
    let s = p.to_string_lossy();
    if s.starts_with("http://") || s.starts_with("https://") || s.starts_with("data:") {
        return Err(PosterError::asset_load(format!(
            "remote asset '{s}' is not supported; download it and reference the local file"
        )));
    }
    if s.trim().is_empty() {
        return Err(PosterError::asset_load("asset path must be non-empty"));
    }
    Ok(root.join(p))
}

fn read_bytes(path: &Path) -> PosterResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(|e| PosterError::asset_load(format!("{e:#}")))
}

fn load_background(
    source: &Path,
    root: &Path,
    canvas: Canvas,
    raster_scale: f64,
) -> PosterResult<PreparedImage> {
    let path = resolve(root, source)?;
    let bytes = read_bytes(&path)?;
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    let decoded = if is_svg {
        assets_decode::parse_svg(&bytes)
            .and_then(|tree| assets_decode::rasterize_svg_cover(&tree, canvas, raster_scale))
    } else {
        assets_decode::decode_image(&bytes)
    };
    decoded.map_err(|e| match e {
        PosterError::AssetLoad(_) | PosterError::Validation(_) => e,
        other => PosterError::asset_load(format!(
            "background '{}': {}",
            path.display(),
            error_chain(&other)
        )),
    })
}

fn error_chain(e: &PosterError) -> String {
    match e {
        PosterError::Other(inner) => format!("{inner:#}"),
        other => other.to_string(),
    }
}

fn load_face(source: &FontSource, root: &Path) -> PosterResult<FontdueFace> {
    match source {
        FontSource::File { path, index } => {
            let path = resolve(root, path)?;
            let bytes = read_bytes(&path)?;
            let fallback_name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("font")
                .to_string();
            FontdueFace::from_bytes(&bytes, *index, fallback_name)
        }
        FontSource::System { families } => load_system_face(families),
    }
}

fn load_system_face(families: &[String]) -> PosterResult<FontdueFace> {
    if families.is_empty() {
        return Err(PosterError::validation(
            "system font source needs at least one family",
        ));
    }

    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let query_families = families
        .iter()
        .map(|f| match f.to_ascii_lowercase().as_str() {
            "serif" => usvg::fontdb::Family::Serif,
            "sans-serif" => usvg::fontdb::Family::SansSerif,
            "monospace" => usvg::fontdb::Family::Monospace,
            _ => usvg::fontdb::Family::Name(f.as_str()),
        })
        .collect::<Vec<_>>();
    let query = usvg::fontdb::Query {
        families: &query_families,
        weight: usvg::fontdb::Weight::NORMAL,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };

    let id = db.query(&query).ok_or_else(|| {
        PosterError::asset_load(format!(
            "no system font matches [{}]",
            families.join(", ")
        ))
    })?;
    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| families[0].clone());

    db.with_face_data(id, |data, index| {
        FontdueFace::from_bytes(data, index, family.clone())
    })
    .ok_or_else(|| PosterError::asset_load(format!("font data for '{family}' is unavailable")))?
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
