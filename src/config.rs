use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::store::{AssetSources, FontSource},
    export::png::ExportSettings,
    foundation::error::{PosterError, PosterResult},
    poster::{catalog::Catalog, layout::PosterLayout},
    render::preview::DEFAULT_PREVIEW_SCALE,
};

/// Everything a poster session is configured with. Every field is optional in JSON.
///
/// ```json
/// {
///   "assets": { "background": "lux-final-bg.jpg", "font": { "path": "fonts/times.ttf" } },
///   "layout": { "list_top": 620, "ink": "#111" },
///   "export": { "render_scale": 3, "file_prefix": "lux-ranking" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PosterConfig {
    /// Titles the user picks from.
    pub catalog: Catalog,
    /// Background and font sources.
    pub assets: AssetSources,
    /// Layout constants.
    pub layout: PosterLayout,
    /// Export defaults.
    pub export: ExportSettings,
    /// Preview px per canvas unit until a viewport size is known.
    pub preview_scale: f64,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            assets: AssetSources::default(),
            layout: PosterLayout::default(),
            export: ExportSettings::default(),
            preview_scale: DEFAULT_PREVIEW_SCALE,
        }
    }
}

impl PosterConfig {
    /// Parse and validate JSON. Relative paths stay as written.
    pub fn from_json_str(json: &str) -> PosterResult<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| PosterError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a JSON config. Relative asset paths are made relative to the file's directory.
    pub fn from_json_file(path: &Path) -> PosterResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        cfg.assets = cfg.assets.rebased(root);
        Ok(cfg)
    }

    /// Check every section.
    pub fn validate(&self) -> PosterResult<()> {
        self.layout.validate()?;
        self.export.validate()?;
        if !self.preview_scale.is_finite() || self.preview_scale <= 0.0 {
            return Err(PosterError::validation("preview_scale must be finite and > 0"));
        }
        Ok(())
    }
}

impl AssetSources {
    /// Same sources with relative file paths joined onto `root`.
    pub fn rebased(&self, root: &Path) -> Self {
        let join = |p: &PathBuf| -> PathBuf {
            if p.is_absolute() || is_remote(p) {
                p.clone()
            } else {
                root.join(p)
            }
        };
        Self {
            background: join(&self.background),
            font: match &self.font {
                FontSource::File { path, index } => FontSource::File {
                    path: join(path),
                    index: *index,
                },
                other => other.clone(),
            },
        }
    }
}

fn is_remote(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("data:")
}
