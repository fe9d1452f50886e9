use crate::{
    foundation::error::{PosterError, PosterResult},
    poster::catalog::Selection,
    text::normalize::{collapse_whitespace, display_title},
};

/// What one poster shows: ranked titles and an optional signature.
///
/// Titles are kept as picked; display normalization (case, whitespace) happens at composition.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PosterSpec {
    entries: Vec<String>,
    signature: Option<String>,
}

impl PosterSpec {
    /// Validate and build. More than `max_rows` entries is an error, and so are two entries that
    /// print the same once uppercased and whitespace-collapsed. The signature is trimmed and
    /// dropped when empty.
    pub fn new(
        entries: Vec<String>,
        signature: Option<&str>,
        max_rows: usize,
    ) -> PosterResult<Self> {
        if entries.len() > max_rows {
            return Err(PosterError::validation(format!(
                "poster holds at most {max_rows} rows, got {}",
                entries.len()
            )));
        }
        let mut shown: Vec<String> = Vec::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            let display = display_title(e);
            if display.is_empty() {
                return Err(PosterError::validation(format!("entry {} is empty", i + 1)));
            }
            if shown.contains(&display) {
                return Err(PosterError::validation(format!(
                    "entry '{e}' is ranked twice"
                )));
            }
            shown.push(display);
        }
        Ok(Self {
            entries,
            signature: normalize_signature(signature),
        })
    }

    /// Snapshot of a selection, keeping at most `max_rows` of its picks.
    pub fn from_selection(
        selection: &Selection,
        signature: Option<&str>,
        max_rows: usize,
    ) -> PosterResult<Self> {
        let mut titles = selection.titles();
        titles.truncate(max_rows);
        Self::new(titles, signature, max_rows)
    }

    /// Ranked titles as picked.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Trimmed signature, if any.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// No ranked titles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_signature(raw: Option<&str>) -> Option<String> {
    raw.map(collapse_whitespace).filter(|s| !s.is_empty())
}
