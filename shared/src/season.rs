use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Visual style tag for a season's trophy tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrophyStyle {
    Classic,
    Shield,
    Star,
    Laurel,
    Crown,
    Football,
    Ring,
    Rocket,
}

impl TrophyStyle {
    /// Rotation order used when a season does not name a style.
    pub const ALL: [TrophyStyle; 8] = [
        Self::Classic,
        Self::Shield,
        Self::Star,
        Self::Laurel,
        Self::Crown,
        Self::Football,
        Self::Ring,
        Self::Rocket,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "classic" => Some(Self::Classic),
            "shield" => Some(Self::Shield),
            "star" => Some(Self::Star),
            "laurel" => Some(Self::Laurel),
            "crown" => Some(Self::Crown),
            "football" => Some(Self::Football),
            "ring" => Some(Self::Ring),
            "rocket" => Some(Self::Rocket),
            _ => None,
        }
    }

    /// Explicit style wins; otherwise rotate through [`TrophyStyle::ALL`] by year.
    /// A season without a year gets the first style.
    pub fn for_season(explicit: Option<Self>, year: Option<i32>) -> Self {
        if let Some(style) = explicit {
            return style;
        }
        let idx = year
            .map(|y| y.rem_euclid(Self::ALL.len() as i32) as usize)
            .unwrap_or(0);
        Self::ALL[idx]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Place {
    First,
    Second,
    Third,
}

impl Place {
    pub const ALL: [Place; 3] = [Self::First, Self::Second, Self::Third];

    pub fn from_number(place: i64) -> Option<Self> {
        match place {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    pub fn medal(self) -> &'static str {
        match self {
            Self::First => "🥇",
            Self::Second => "🥈",
            Self::Third => "🥉",
        }
    }
}

/// One `top3` entry as it appeared in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodiumEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// A validated podium finish: known place and a trimmed, non-empty name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placing {
    pub place: Place,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl PlayerRef {
    /// `"{player} ({pos}, {team})"`, absent parts rendered empty.
    pub fn describe(&self) -> String {
        format!(
            "{} ({}, {})",
            self.player.as_deref().unwrap_or_default(),
            self.pos.as_deref().unwrap_or_default(),
            self.team.as_deref().unwrap_or_default(),
        )
    }

    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            player: string_field(obj, "player"),
            pos: string_field(obj, "pos"),
            team: string_field(obj, "team"),
        })
    }
}

/// One completed season after load-time normalization.
/// Built with [`SeasonRecord::from_value`], which fills `podium`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top3: Vec<PodiumEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trophy_style: Option<TrophyStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trophy_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trophy_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adp1: Option<PlayerRef>,
    #[serde(rename = "nonQBTop", skip_serializing_if = "Option::is_none")]
    pub non_qb_top: Option<PlayerRef>,
    pub podium: Vec<Placing>,
}

impl SeasonRecord {
    /// Build a record from one element of the document's season array.
    /// Returns `None` when the element is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let top3: Vec<PodiumEntry> = obj
            .get("top3")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let entry = entry.as_object()?;
                        Some(PodiumEntry {
                            place: entry.get("place").and_then(integer_value),
                            name: string_field(entry, "name"),
                            team: string_field(entry, "team"),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut record = Self {
            year: obj
                .get("year")
                .and_then(integer_value)
                .and_then(|y| i32::try_from(y).ok()),
            champion: string_field(obj, "champion").or_else(|| string_field(obj, "first")),
            second: string_field(obj, "second")
                .or_else(|| string_field(obj, "runnerUp"))
                .or_else(|| string_field(obj, "runner-up")),
            third: string_field(obj, "third"),
            top3,
            team: string_field(obj, "team"),
            note: string_field(obj, "note"),
            trophy_style: obj
                .get("trophyStyle")
                .and_then(Value::as_str)
                .and_then(TrophyStyle::from_tag),
            trophy_image: string_field(obj, "trophyImage"),
            trophy_color: string_field(obj, "trophyColor"),
            adp1: obj.get("adp1").and_then(PlayerRef::from_value),
            non_qb_top: obj.get("nonQBTop").and_then(PlayerRef::from_value),
            podium: Vec::new(),
        };
        record.podium = record.canonical_podium();
        Some(record)
    }

    /// `top3` is authoritative when non-empty; otherwise the flat champion
    /// field becomes a lone first-place finish.
    pub fn canonical_podium(&self) -> Vec<Placing> {
        if !self.top3.is_empty() {
            return self
                .top3
                .iter()
                .filter_map(|entry| {
                    let place = entry.place.and_then(Place::from_number)?;
                    let name = clean_name(entry.name.as_deref())?;
                    Some(Placing {
                        place,
                        name,
                        team: entry.team.clone(),
                    })
                })
                .collect();
        }

        clean_name(self.champion.as_deref())
            .map(|name| {
                vec![Placing {
                    place: Place::First,
                    name,
                    team: self.team.clone(),
                }]
            })
            .unwrap_or_default()
    }

    /// Display name for a place: canonical podium first, then the flat field.
    pub fn name_at(&self, place: Place) -> Option<&str> {
        if let Some(placing) = self.podium.iter().find(|p| p.place == place) {
            return Some(placing.name.as_str());
        }
        let flat = match place {
            Place::First => self.champion.as_deref(),
            Place::Second => self.second.as_deref(),
            Place::Third => self.third.as_deref(),
        };
        flat.map(str::trim).filter(|name| !name.is_empty())
    }

    pub fn resolved_style(&self) -> TrophyStyle {
        TrophyStyle::for_season(self.trophy_style, self.year)
    }

    /// Sort key; a missing year orders as `0`.
    pub fn sort_year(&self) -> i32 {
        self.year.unwrap_or(0)
    }

    pub fn detail(&self) -> SeasonDetail {
        let title = match self.year {
            Some(year) => format!("Season {year}"),
            None => "Season".to_owned(),
        };

        let podium = Place::ALL
            .iter()
            .filter_map(|&place| {
                self.name_at(place).map(|name| PodiumLine {
                    place,
                    medal: place.medal(),
                    name: name.to_owned(),
                })
            })
            .collect();

        let mut notes = Vec::new();
        if let Some(adp) = &self.adp1 {
            notes.push(format!("Highest ADP: {}", adp.describe()));
        }
        if let Some(top) = &self.non_qb_top {
            notes.push(format!("Top Non-QB: {}", top.describe()));
        }
        if let Some(note) = self.note.as_deref().filter(|n| !n.trim().is_empty()) {
            notes.push(note.to_owned());
        }

        SeasonDetail {
            year: self.year,
            title,
            podium,
            notes,
            trophy_style: self.resolved_style(),
            trophy_image: self.trophy_image.clone(),
            trophy_color: self.trophy_color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodiumLine {
    pub place: Place,
    pub medal: &'static str,
    pub name: String,
}

/// Everything the season dialog shows for one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonDetail {
    pub year: Option<i32>,
    pub title: String,
    pub podium: Vec<PodiumLine>,
    pub notes: Vec<String>,
    pub trophy_style: TrophyStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trophy_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trophy_color: Option<String>,
}

fn clean_name(name: Option<&str>) -> Option<String> {
    let trimmed = name?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Place, Placing, SeasonRecord, TrophyStyle};

    fn record(value: serde_json::Value) -> SeasonRecord {
        SeasonRecord::from_value(&value).expect("object should parse")
    }

    #[test]
    fn non_object_elements_are_not_records() {
        assert!(SeasonRecord::from_value(&json!(42)).is_none());
        assert!(SeasonRecord::from_value(&json!("2024")).is_none());
        assert!(SeasonRecord::from_value(&json!(null)).is_none());
    }

    #[test]
    fn empty_object_is_a_sparse_record() {
        let season = record(json!({}));
        assert_eq!(season, SeasonRecord::default());
        assert!(season.podium.is_empty());
    }

    #[test]
    fn first_is_an_alias_for_champion() {
        let season = record(json!({"year": 2022, "first": "Dana", "second": "Eli"}));
        assert_eq!(season.champion.as_deref(), Some("Dana"));
        assert_eq!(season.podium.len(), 1);
        assert_eq!(season.podium[0].place, Place::First);
        assert_eq!(season.podium[0].name, "Dana");
    }

    #[test]
    fn top3_is_authoritative_over_flat_fields() {
        let season = record(json!({
            "champion": "Flat",
            "top3": [
                {"place": 2, "name": "Bo"},
                {"place": 1, "name": " Al ", "team": "Falcons"},
                {"place": 4, "name": "Ignored"},
                {"place": 3, "name": "   "}
            ]
        }));
        let names: Vec<_> = season.podium.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bo", "Al"]);
        assert_eq!(season.podium[1].team.as_deref(), Some("Falcons"));
        assert_eq!(season.name_at(Place::First), Some("Al"));
    }

    #[test]
    fn non_object_top3_entries_fall_back_to_champion() {
        let season = record(json!({
            "champion": "Flat",
            "team": "Owls",
            "top3": [42, "Bo", null]
        }));
        assert!(season.top3.is_empty());
        assert_eq!(
            season.podium,
            [Placing {
                place: Place::First,
                name: "Flat".to_owned(),
                team: Some("Owls".to_owned()),
            }]
        );
    }

    #[test]
    fn year_accepts_numeric_strings_and_rejects_garbage() {
        assert_eq!(record(json!({"year": "2023"})).year, Some(2023));
        assert_eq!(record(json!({"year": 2021.0})).year, Some(2021));
        assert_eq!(record(json!({"year": "soon"})).year, None);
        assert_eq!(record(json!({"year": [2020]})).year, None);
    }

    #[test]
    fn unknown_trophy_style_is_dropped() {
        assert_eq!(
            record(json!({"trophyStyle": "Crown"})).trophy_style,
            Some(TrophyStyle::Crown)
        );
        assert_eq!(record(json!({"trophyStyle": "blimp"})).trophy_style, None);
    }

    #[test]
    fn style_rotates_by_year_when_not_named() {
        assert_eq!(
            TrophyStyle::for_season(None, Some(2025)),
            TrophyStyle::ALL[2025 % 8]
        );
        assert_eq!(TrophyStyle::for_season(None, None), TrophyStyle::Classic);
        assert_eq!(
            TrophyStyle::for_season(Some(TrophyStyle::Ring), Some(2025)),
            TrophyStyle::Ring
        );
        assert_eq!(TrophyStyle::for_season(None, Some(-1)), TrophyStyle::Rocket);
    }

    #[test]
    fn detail_builds_podium_lines_and_notes() {
        let season = record(json!({
            "year": 2024,
            "champion": "Alice",
            "second": "Bob",
            "note": "Won on a walk-off",
            "adp1": {"player": "J. Allen", "pos": "QB", "team": "BUF"},
            "nonQBTop": {"player": "C. McCaffrey", "pos": "RB"}
        }));
        let detail = season.detail();

        assert_eq!(detail.title, "Season 2024");
        let lines: Vec<_> = detail
            .podium
            .iter()
            .map(|line| (line.place, line.name.as_str()))
            .collect();
        assert_eq!(lines, [(Place::First, "Alice"), (Place::Second, "Bob")]);
        assert_eq!(
            detail.notes,
            [
                "Highest ADP: J. Allen (QB, BUF)",
                "Top Non-QB: C. McCaffrey (RB, )",
                "Won on a walk-off",
            ]
        );
        assert_eq!(detail.trophy_style, TrophyStyle::ALL[2024 % 8]);
    }

    #[test]
    fn serializes_with_document_field_names() {
        let season = record(json!({
            "year": 2020,
            "trophyStyle": "star",
            "nonQBTop": {"player": "X"}
        }));
        let value = serde_json::to_value(&season).expect("serialize season");
        assert_eq!(value["trophyStyle"], "star");
        assert_eq!(value["nonQBTop"]["player"], "X");
        assert!(value.get("champion").is_none());
    }
}
