use serde_json::Value;
use thiserror::Error;

use crate::season::SeasonRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("champions document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("champions document has an unsupported shape: {0}")]
    MalformedInput(&'static str),
}

/// Seasons loaded for one session. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonStore {
    league: Option<String>,
    seasons: Vec<SeasonRecord>,
    skipped: usize,
}

impl SeasonStore {
    /// Accepts a bare array of seasons or `{ "league": ..., "seasons": [...] }`.
    pub fn load(raw: &Value) -> Result<Self, StoreError> {
        let (league, items) = match raw {
            Value::Array(items) => (None, items),
            Value::Object(obj) => {
                let items = match obj.get("seasons") {
                    Some(Value::Array(items)) => items,
                    Some(_) => return Err(StoreError::MalformedInput("`seasons` is not an array")),
                    None => return Err(StoreError::MalformedInput("object has no `seasons` array")),
                };
                let league = obj
                    .get("league")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_owned);
                (league, items)
            }
            Value::Null => return Err(StoreError::MalformedInput("root is null")),
            Value::Bool(_) => return Err(StoreError::MalformedInput("root is a boolean")),
            Value::Number(_) => return Err(StoreError::MalformedInput("root is a number")),
            Value::String(_) => return Err(StoreError::MalformedInput("root is a string")),
        };

        let seasons: Vec<SeasonRecord> = items.iter().filter_map(SeasonRecord::from_value).collect();
        let skipped = items.len() - seasons.len();

        Ok(Self {
            league,
            seasons,
            skipped,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, StoreError> {
        let raw: Value = serde_json::from_slice(bytes)?;
        Self::load(&raw)
    }

    /// Degraded load: any failure yields an empty store alongside the error.
    pub fn load_or_empty(raw: &Value) -> (Self, Option<StoreError>) {
        match Self::load(raw) {
            Ok(store) => (store, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn from_slice_or_empty(bytes: &[u8]) -> (Self, Option<StoreError>) {
        match Self::from_slice(bytes) {
            Ok(store) => (store, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn league(&self) -> Option<&str> {
        self.league.as_deref()
    }

    pub fn seasons(&self) -> &[SeasonRecord] {
        &self.seasons
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// Number of array elements dropped because they were not objects.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// First season carrying `year`, in document order.
    pub fn find(&self, year: i32) -> Option<&SeasonRecord> {
        self.seasons.iter().find(|season| season.year == Some(year))
    }
}
