use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::code::CompetitorCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub position: u32,
    pub code: CompetitorCode,
    pub points: f64,
}

impl StandingsEntry {
    pub fn new(position: u32, code: impl Into<CompetitorCode>, points: f64) -> Self {
        Self {
            position,
            code: code.into(),
            points,
        }
    }
}

/// Current championship order for one competitor kind.
///
/// Position 0 is the storage default for a competitor that has not been
/// classified yet, so such entries are never part of the table. The snapshot
/// may be stale; nothing here assumes it was refreshed recently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandingsTable {
    by_position: BTreeMap<u32, StandingsEntry>,
}

impl StandingsTable {
    /// Builds the table from provider positions as they are.
    ///
    /// When two entries claim the same position the first one wins.
    pub fn new(entries: impl IntoIterator<Item = StandingsEntry>) -> Self {
        let mut by_position = BTreeMap::new();
        for entry in entries {
            if entry.position == 0 {
                continue;
            }
            by_position.entry(entry.position).or_insert(entry);
        }
        Self { by_position }
    }

    /// Builds the table with `excluded` competitors removed and the remaining
    /// ones re-ranked densely from 1.
    ///
    /// Used for drivers replaced mid-season, whose results would otherwise
    /// shift every position below them.
    pub fn adjusted(
        entries: impl IntoIterator<Item = StandingsEntry>,
        excluded: &[CompetitorCode],
    ) -> Self {
        let mut entries: Vec<StandingsEntry> = entries
            .into_iter()
            .filter(|entry| entry.position != 0 && !excluded.contains(&entry.code))
            .collect();
        entries.sort_by_key(|entry| entry.position);

        let by_position = entries
            .into_iter()
            .zip(1u32..)
            .map(|(entry, position)| (position, StandingsEntry { position, ..entry }))
            .collect();

        Self { by_position }
    }

    pub fn holder_at(&self, position: u32) -> Option<&CompetitorCode> {
        self.by_position.get(&position).map(|entry| &entry.code)
    }

    pub fn position_of(&self, code: &CompetitorCode) -> Option<u32> {
        self.by_position
            .values()
            .find(|entry| &entry.code == code)
            .map(|entry| entry.position)
    }

    pub fn entries(&self) -> impl Iterator<Item = &StandingsEntry> {
        self.by_position.values()
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<StandingsEntry> {
        vec![
            StandingsEntry::new(2, "NOR", 300.0),
            StandingsEntry::new(1, "PIA", 310.0),
            StandingsEntry::new(3, "COL", 280.0),
            StandingsEntry::new(4, "VER", 270.0),
            StandingsEntry::new(0, "DOO", 0.0),
        ]
    }

    #[test]
    fn test_lookups() {
        let table = StandingsTable::new(entries());
        assert_eq!(table.len(), 4);
        assert_eq!(table.holder_at(1), Some(&CompetitorCode::new("PIA")));
        assert_eq!(table.position_of(&CompetitorCode::new("VER")), Some(4));
        assert_eq!(table.position_of(&CompetitorCode::new("DOO")), None);
        assert_eq!(table.holder_at(0), None);
    }

    #[test]
    fn test_adjusted_reranks_densely() {
        let table = StandingsTable::adjusted(entries(), &[CompetitorCode::new("COL")]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.holder_at(3), Some(&CompetitorCode::new("VER")));
        assert_eq!(table.holder_at(4), None);
        let positions: Vec<u32> = table.entries().map(|entry| entry.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_position_keeps_first() {
        let table = StandingsTable::new(vec![
            StandingsEntry::new(1, "HAM", 10.0),
            StandingsEntry::new(1, "RUS", 10.0),
        ]);
        assert_eq!(table.holder_at(1), Some(&CompetitorCode::new("HAM")));
        assert_eq!(table.position_of(&CompetitorCode::new("RUS")), None);
    }
}
