use std::sync::Arc;

use crate::{
    foundation::error::{PosterError, PosterResult},
    text::normalize::{collapse_whitespace, display_title},
};

/// Track titles of the album the poster ranks, in release order.
pub const DEFAULT_TRACKS: &[&str] = &[
    "Sexo, Violencia y Llantas",
    "Reliquia",
    "Divinize",
    "Porcelana",
    "Mio Cristo Piange Diamanti",
    "Berghain",
    "La Perla",
    "Mundo Nuevo",
    "De Madrugá",
    "Dios Es Un Stalker",
    "La Yugular",
    "Focu ‘ranni",
    "Sauvignon Blanc",
    "Jeanne",
    "Novia Robot",
    "La Rumba Del Perdón",
    "Memória",
    "Magnolias",
];

/// Default number of picks a ranking holds.
pub const DEFAULT_LIMIT: usize = 8;

/// Immutable, ordered list of unique titles the user picks from.
///
/// Cloning is cheap; selections share the catalog they were built from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Catalog {
    titles: Arc<[String]>,
}

impl Catalog {
    /// Build a catalog. Titles are whitespace-collapsed; empty titles and titles that print the
    /// same on the poster (differing only in case or spacing) are rejected.
    pub fn new<I, S>(titles: I) -> PosterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        let mut shown: Vec<String> = Vec::new();
        for raw in titles {
            let title = collapse_whitespace(raw.as_ref());
            if title.is_empty() {
                return Err(PosterError::validation("catalog titles must be non-empty"));
            }
            let display = display_title(&title);
            if shown.contains(&display) {
                return Err(PosterError::validation(format!(
                    "catalog title '{title}' appears more than once"
                )));
            }
            out.push(title);
            shown.push(display);
        }
        if out.is_empty() {
            return Err(PosterError::validation("catalog must not be empty"));
        }
        Ok(Self {
            titles: out.into(),
        })
    }

    /// All titles in catalog order.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Number of titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether there are no titles. Validated catalogs always hold one.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Title at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.titles.get(index).map(String::as_str)
    }

    /// Index of `title`, compared after whitespace collapsing.
    pub fn position(&self, title: &str) -> Option<usize> {
        let needle = collapse_whitespace(title);
        self.titles.iter().position(|t| *t == needle)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            titles: DEFAULT_TRACKS.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Catalog {
    type Error = PosterError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Catalog> for Vec<String> {
    fn from(value: Catalog) -> Self {
        value.titles.to_vec()
    }
}

/// What happened to an [`Selection::add`] request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended at this 0-based rank.
    Added(usize),
    /// Selection is already full; nothing changed.
    LimitReached,
    /// Title is already ranked; nothing changed.
    Duplicate,
    /// Title is not part of the catalog; nothing changed.
    NotInCatalog,
}

impl AddOutcome {
    /// Whether the title was appended.
    pub fn is_added(self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// Ordered, duplicate-free picks from a [`Catalog`], bounded by a limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    catalog: Catalog,
    picks: Vec<usize>,
    limit: usize,
}

impl Selection {
    /// Empty selection over `catalog`. `limit` must be at least 1.
    pub fn new(catalog: Catalog, limit: usize) -> PosterResult<Self> {
        if limit == 0 {
            return Err(PosterError::validation("selection limit must be >= 1"));
        }
        Ok(Self {
            catalog,
            picks: Vec::with_capacity(limit),
            limit,
        })
    }

    /// Catalog the picks index into.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Most picks allowed.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of picks so far.
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    /// No picks yet.
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// The limit is reached.
    pub fn is_full(&self) -> bool {
        self.picks.len() >= self.limit
    }

    /// Append `title` as the next rank. Never fails: rejected requests leave the selection as is.
    pub fn add(&mut self, title: &str) -> AddOutcome {
        let Some(index) = self.catalog.position(title) else {
            return AddOutcome::NotInCatalog;
        };
        if self.picks.contains(&index) {
            return AddOutcome::Duplicate;
        }
        if self.is_full() {
            return AddOutcome::LimitReached;
        }
        self.picks.push(index);
        AddOutcome::Added(self.picks.len() - 1)
    }

    /// Remove the last pick. `None` on an empty selection.
    pub fn undo(&mut self) -> Option<String> {
        let index = self.picks.pop()?;
        self.catalog.get(index).map(str::to_string)
    }

    /// Remove `title` wherever it is ranked; later picks move up one rank.
    pub fn remove(&mut self, title: &str) -> bool {
        let Some(index) = self.catalog.position(title) else {
            return false;
        };
        let before = self.picks.len();
        self.picks.retain(|&i| i != index);
        self.picks.len() != before
    }

    /// Drop every pick.
    pub fn clear(&mut self) {
        self.picks.clear();
    }

    /// Picked titles in rank order.
    pub fn titles(&self) -> Vec<String> {
        self.picks
            .iter()
            .filter_map(|&i| self.catalog.get(i))
            .map(str::to_string)
            .collect()
    }

    /// Catalog titles not picked yet, in catalog order.
    pub fn remaining(&self) -> Vec<String> {
        self.catalog
            .titles()
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.picks.contains(i))
            .map(|(_, t)| t.clone())
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poster/catalog.rs"]
mod tests;
