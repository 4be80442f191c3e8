use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::season::SeasonRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[default]
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortOrderError(pub String);

impl fmt::Display for ParseSortOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort order `{}`", self.0)
    }
}

impl std::error::Error for ParseSortOrderError {}

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ParseSortOrderError(s.to_owned())),
        }
    }
}

/// Space-joined searchable text of a season. Absent fields contribute empty
/// segments, so partial matches can straddle two adjacent fields.
pub fn search_text(season: &SeasonRecord) -> String {
    let year = season.year.map(|y| y.to_string()).unwrap_or_default();
    let mut parts: Vec<&str> = vec![
        year.as_str(),
        season.champion.as_deref().unwrap_or_default(),
        season.second.as_deref().unwrap_or_default(),
        season.third.as_deref().unwrap_or_default(),
        season.note.as_deref().unwrap_or_default(),
        season.team.as_deref().unwrap_or_default(),
    ];
    for entry in &season.top3 {
        parts.push(entry.name.as_deref().unwrap_or_default());
        parts.push(entry.team.as_deref().unwrap_or_default());
    }
    parts.join(" ")
}

/// Case-insensitive substring test against [`search_text`].
pub fn matches(season: &SeasonRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    search_text(season)
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// Filtered copy of `seasons`, stably sorted by year. Missing years sort as `0`.
pub fn list(seasons: &[SeasonRecord], query: &str, order: SortOrder) -> Vec<SeasonRecord> {
    let mut out: Vec<SeasonRecord> = seasons
        .iter()
        .filter(|season| matches(season, query))
        .cloned()
        .collect();

    match order {
        SortOrder::Ascending => out.sort_by_key(SeasonRecord::sort_year),
        SortOrder::Descending => out.sort_by(|a, b| b.sort_year().cmp(&a.sort_year())),
    }
    out
}
