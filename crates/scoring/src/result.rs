use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::RaceCategory;
use crate::code::CompetitorCode;

/// Official value of one result slot: a competitor or free text (bonus answer,
/// safety car count). Both empty means the slot is not loaded yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultValue {
    pub competitor: Option<CompetitorCode>,
    pub text: Option<String>,
}

impl ResultValue {
    pub fn competitor(code: impl Into<CompetitorCode>) -> Self {
        Self {
            competitor: Some(code.into()),
            text: None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            competitor: None,
            text: Some(value.into()),
        }
    }

    /// Competitor code if set, otherwise the non-blank text.
    pub fn as_str(&self) -> Option<&str> {
        self.competitor
            .as_ref()
            .map(CompetitorCode::as_str)
            .or_else(|| self.text.as_deref().map(str::trim).filter(|text| !text.is_empty()))
    }

    pub fn is_loaded(&self) -> bool {
        self.as_str().is_some()
    }
}

/// Official results of one race, keyed by (category, rank).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceResult {
    has_sprint: bool,
    entries: BTreeMap<(RaceCategory, Option<u8>), ResultValue>,
}

impl RaceResult {
    pub fn new(has_sprint: bool) -> Self {
        Self {
            has_sprint,
            entries: BTreeMap::new(),
        }
    }

    /// Stores a slot, replacing an earlier value. Returns `false` and ignores
    /// the entry when the rank is not valid for the category.
    pub fn insert(&mut self, category: RaceCategory, rank: Option<u8>, value: ResultValue) -> bool {
        match category.normalize_rank(rank) {
            Some(rank) => {
                self.entries.insert((category, rank), value);
                true
            }
            None => {
                debug!(%category, ?rank, "ignoring result entry with invalid rank");
                false
            }
        }
    }

    pub fn with_competitor(mut self, category: RaceCategory, rank: Option<u8>, code: &str) -> Self {
        self.insert(category, rank, ResultValue::competitor(code));
        self
    }

    pub fn with_text(mut self, category: RaceCategory, rank: Option<u8>, text: &str) -> Self {
        self.insert(category, rank, ResultValue::text(text));
        self
    }

    pub fn has_sprint(&self) -> bool {
        self.has_sprint
    }

    pub fn get(&self, category: RaceCategory, rank: Option<u8>) -> Option<&ResultValue> {
        let rank = category.normalize_rank(rank)?;
        self.entries.get(&(category, rank))
    }

    /// Loaded official value of a slot, `None` while it is still empty.
    pub fn value(&self, category: RaceCategory, rank: Option<u8>) -> Option<&str> {
        self.get(category, rank).and_then(ResultValue::as_str)
    }

    /// Official top three, index 0 being the winner.
    pub fn podium(&self) -> [Option<CompetitorCode>; 3] {
        [1, 2, 3].map(|rank| {
            self.value(RaceCategory::Race, Some(rank))
                .and_then(CompetitorCode::parse)
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = (RaceCategory, Option<u8>, &ResultValue)> {
        self.entries
            .iter()
            .map(|((category, rank), value)| (*category, *rank, value))
    }

    pub fn is_empty(&self) -> bool {
        !self.entries.values().any(ResultValue::is_loaded)
    }
}
