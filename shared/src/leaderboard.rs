use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::season::{Place, SeasonRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub first: u32,
    pub second: u32,
    pub third: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    first: u32,
    second: u32,
    third: u32,
}

impl Tally {
    fn record(&mut self, place: Place) {
        match place {
            Place::First => self.first += 1,
            Place::Second => self.second += 1,
            Place::Third => self.third += 1,
        }
    }
}

/// Podium finishes per competitor across every season, ranked by firsts,
/// then seconds, then thirds, then name.
pub fn rank(seasons: &[SeasonRecord]) -> Vec<LeaderboardRow> {
    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    for season in seasons {
        for placing in &season.podium {
            tallies
                .entry(placing.name.as_str())
                .or_default()
                .record(placing.place);
        }
    }

    let mut rows: Vec<LeaderboardRow> = tallies
        .into_iter()
        .map(|(name, tally)| LeaderboardRow {
            name: name.to_owned(),
            first: tally.first,
            second: tally.second,
            third: tally.third,
            total: tally.first + tally.second + tally.third,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.first
            .cmp(&a.first)
            .then_with(|| b.second.cmp(&a.second))
            .then_with(|| b.third.cmp(&a.third))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

/// Ranked leaderboard, then narrowed to names containing `query`
/// (case-insensitive). Counts always cover the full store.
pub fn leaderboard(seasons: &[SeasonRecord], query: &str) -> Vec<LeaderboardRow> {
    let rows = rank(seasons);
    if query.is_empty() {
        return rows;
    }
    let needle = query.to_lowercase();
    rows.into_iter()
        .filter(|row| row.name.to_lowercase().contains(&needle))
        .collect()
}
