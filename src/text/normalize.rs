/// Collapse whitespace runs to single spaces and trim both ends.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Display form of a title: whitespace collapsed, then uppercased with full Unicode case mapping
/// so accented letters keep their accents ("Memória" -> "MEMÓRIA").
pub fn display_title(raw: &str) -> String {
    collapse_whitespace(raw).to_uppercase()
}
