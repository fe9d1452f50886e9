use std::{path::Path, sync::Arc};

use chrono::{DateTime, Local};

use crate::{
    assets::store::{AssetSources, PreparedAssets},
    compile::{compose::compose_poster, plan::PosterPlan},
    config::PosterConfig,
    export::png::{ExportArtifact, ExportSettings, export_poster},
    foundation::error::{PosterError, PosterResult},
    poster::{
        catalog::{AddOutcome, Selection},
        layout::PosterLayout,
        spec::PosterSpec,
    },
    render::{backend::FrameRGBA, preview::PreviewSurface},
};

/// Load state of the background and font.
#[derive(Clone, Debug)]
pub enum AssetState {
    /// Nothing loaded yet.
    Pending,
    /// Decoded and shared with every render.
    Ready(Arc<PreparedAssets>),
    /// Last load failed with this message. Calling `load_assets` again retries.
    Failed(String),
}

impl AssetState {
    /// Assets loaded and usable.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// State behind one ranking UI: picks, signature, assets and the live preview.
///
/// Every query recomposes from the current state, so the preview and the export can never lag
/// behind the last edit.
#[derive(Debug)]
pub struct RankingSession {
    selection: Selection,
    signature: String,
    layout: PosterLayout,
    export: ExportSettings,
    assets: AssetState,
    preview: PreviewSurface,
}

impl RankingSession {
    /// Session with an empty selection and pending assets.
    pub fn new(config: &PosterConfig) -> PosterResult<Self> {
        config.layout.validate()?;
        config.export.validate()?;
        Ok(Self {
            selection: Selection::new(config.catalog.clone(), config.layout.max_rows)?,
            signature: String::new(),
            layout: config.layout.clone(),
            export: config.export.clone(),
            assets: AssetState::Pending,
            preview: PreviewSurface::new(config.preview_scale)?,
        })
    }

    /// Current picks.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Layout every plan is composed with.
    pub fn layout(&self) -> &PosterLayout {
        &self.layout
    }

    /// Whether assets are pending, loaded or failed.
    pub fn asset_state(&self) -> &AssetState {
        &self.assets
    }

    /// Append a title.
    pub fn add(&mut self, title: &str) -> AddOutcome {
        let outcome = self.selection.add(title);
        tracing::debug!(title, ?outcome, "add");
        outcome
    }

    /// Drop the last pick.
    pub fn undo(&mut self) -> Option<String> {
        self.selection.undo()
    }

    /// Drop a pick anywhere in the list.
    pub fn remove(&mut self, title: &str) -> bool {
        self.selection.remove(title)
    }

    /// Set the raw signature text; it is trimmed when the poster is composed.
    pub fn set_signature(&mut self, signature: impl Into<String>) {
        self.signature = signature.into();
    }

    /// Signature as typed.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Catalog titles not picked yet.
    pub fn remaining(&self) -> Vec<String> {
        self.selection.remaining()
    }

    /// Load assets from disk, replacing whatever was loaded before.
    ///
    /// On failure the state becomes [`AssetState::Failed`] and the error is returned; the
    /// selection is untouched.
    pub fn load_assets(&mut self, sources: &AssetSources, root: &Path) -> PosterResult<()> {
        match PreparedAssets::prepare(sources, root, self.layout.canvas, self.export.render_scale)
        {
            Ok(assets) => {
                self.attach_assets(assets);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "asset load failed");
                self.assets = AssetState::Failed(e.to_string());
                self.preview.invalidate();
                Err(e)
            }
        }
    }

    /// Use already-prepared assets.
    pub fn attach_assets(&mut self, assets: PreparedAssets) {
        self.assets = AssetState::Ready(Arc::new(assets));
        self.preview.invalidate();
    }

    /// Snapshot of what the poster currently shows.
    pub fn poster_spec(&self) -> PosterResult<PosterSpec> {
        PosterSpec::from_selection(
            &self.selection,
            Some(self.signature.as_str()),
            self.layout.max_rows,
        )
    }

    /// Compose the current poster. Requires loaded assets.
    pub fn plan(&self) -> PosterResult<PosterPlan> {
        let assets = self.ready_assets()?;
        compose_poster(&self.poster_spec()?, &self.layout, assets)
    }

    /// Fit the preview to a viewport width.
    pub fn resize_preview(&mut self, viewport_width: u32) -> PosterResult<()> {
        self.preview.resize(viewport_width, self.layout.canvas)
    }

    /// Current preview frame, re-rendered only when the poster or the preview size changed.
    pub fn preview(&mut self) -> PosterResult<Arc<FrameRGBA>> {
        let assets = Arc::clone(self.ready_assets_arc()?);
        let plan = compose_poster(&self.poster_spec()?, &self.layout, &assets)?;
        self.preview.present(&plan, &assets)
    }

    /// Export the current poster as PNG, stamped with the local time.
    pub fn export(&self) -> PosterResult<ExportArtifact> {
        self.export_at(&Local::now())
    }

    /// Export with an explicit timestamp for the file name.
    pub fn export_at(&self, timestamp: &DateTime<Local>) -> PosterResult<ExportArtifact> {
        let assets = self.ready_assets()?;
        let plan = compose_poster(&self.poster_spec()?, &self.layout, assets)?;
        if let Some(shown) = self.preview.presented_fingerprint()
            && shown != plan.fingerprint()
        {
            tracing::debug!(
                %shown,
                exported = %plan.fingerprint(),
                "export differs from the last rendered preview"
            );
        }
        export_poster(&plan, assets, &self.export, timestamp)
    }

    fn ready_assets(&self) -> PosterResult<&PreparedAssets> {
        self.ready_assets_arc().map(|a| &**a)
    }

    fn ready_assets_arc(&self) -> PosterResult<&Arc<PreparedAssets>> {
        match &self.assets {
            AssetState::Ready(a) => Ok(a),
            AssetState::Pending => Err(PosterError::not_ready(
                "background and font are still loading",
            )),
            AssetState::Failed(msg) => Err(PosterError::asset_load(format!(
                "assets failed to load: {msg}"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/ranking_session.rs"]
mod tests;
