/// How rank markers are spelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankStyle {
    /// `I.`, `II.`, `III.`, ...
    #[default]
    Roman,
    /// `1.`, `2.`, `3.`, ...
    Arabic,
}

const ROMAN: &[(u32, &str)] = &[
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Upper-case Roman numeral for `n`. Zero yields an empty string.
pub fn roman(mut n: u32) -> String {
    let mut out = String::new();
    for &(value, sym) in ROMAN {
        while n >= value {
            out.push_str(sym);
            n -= value;
        }
    }
    out
}

/// Marker text for the row at 0-based `index`.
pub fn rank_marker(style: RankStyle, index: usize) -> String {
    let n = u32::try_from(index + 1).unwrap_or(u32::MAX);
    match style {
        RankStyle::Roman => format!("{}.", roman(n)),
        RankStyle::Arabic => format!("{n}."),
    }
}
