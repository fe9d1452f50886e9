//! rankposter turns a fan's ordered track ranking into a 1080x1920 story poster.
//!
//! The pipeline mirrors a small render engine:
//!
//! - Prepare assets once ([`PreparedAssets`]): background image and font face
//! - Compose a [`PosterSpec`] with a [`PosterLayout`] into a backend-agnostic [`PosterPlan`],
//!   auto-fitting every title to its column
//! - Execute the plan with the CPU backend, for a live preview ([`PreviewSurface`]) or a PNG
//!   export ([`export_poster`])
//!
//! [`RankingSession`] bundles selection state, assets and preview behind the hooks a UI needs.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod compile;
/// JSON configuration.
pub mod config;
pub(crate) mod export;
pub(crate) mod fit;
pub(crate) mod poster;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod text;

pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8Premul};
pub use crate::foundation::error::{PosterError, PosterResult};

pub use crate::assets::color::ColorDef;
pub use crate::assets::store::{AssetSources, FontSource, PreparedAssets, PreparedImage};
pub use crate::compile::compose::{compose_poster, cover_rect};
pub use crate::compile::plan::{
    DrawOp, FittedRow, GlyphRun, PlanFingerprint, PosterPlan, RunRole,
};
pub use crate::config::PosterConfig;
pub use crate::export::png::{
    ExportArtifact, ExportSettings, OutputSize, encode_png, export_file_name, export_poster,
};
pub use crate::fit::fitter::{FitParams, FittedText, SAFETY_MARGIN, fit_font_size, fit_text};
pub use crate::poster::catalog::{AddOutcome, Catalog, DEFAULT_LIMIT, DEFAULT_TRACKS, Selection};
pub use crate::poster::layout::{
    BaseSizeStep, BaseSizeSteps, Column, MarkerStyle, PosterLayout, SignatureStyle, TitleStyle,
};
pub use crate::poster::rank::{RankStyle, rank_marker, roman};
pub use crate::poster::spec::PosterSpec;
pub use crate::render::backend::{FrameRGBA, PlanBackend, execute_plan};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::preview::{DEFAULT_PREVIEW_SCALE, PreviewSurface};
pub use crate::session::ranking_session::{AssetState, RankingSession};
pub use crate::text::face::{BlockFace, FontFace, FontdueFace, GlyphMask, LineMetrics};
pub use crate::text::measure::{GlyphLine, PositionedGlyph, layout_glyphs, measure_width};
pub use crate::text::normalize::{collapse_whitespace, display_title};
