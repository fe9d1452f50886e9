/// Convenience result type used across rankposter.
pub type PosterResult<T> = Result<T, PosterError>;

/// Top-level error taxonomy surfaced to callers (UI layers, the CLI).
///
/// Truncating an over-long title is not an error; it is reported on the fitted row instead.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Invalid caller input or a broken selection invariant (too many rows, duplicates, bad
    /// layout constants).
    #[error("validation error: {0}")]
    Validation(String),

    /// Background image or font could not be loaded or decoded.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// Export was requested before the assets it depends on were ready.
    #[error("not ready: {0}")]
    NotReady(String),

    /// Failure inside a render backend.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PosterError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`PosterError::NotReady`] value.
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Build a [`PosterError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PosterError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether a UI should offer a retry for this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AssetLoad(_) | Self::NotReady(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
