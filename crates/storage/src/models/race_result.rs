use scoring::{CompetitorCode, RaceCategory, RaceResult, ResultValue};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

/// One official result slot, with the competitor code resolved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RaceResultEntry {
    pub result_id: Uuid,
    pub race_id: Uuid,
    pub category: String,
    pub rank: Option<i32>,
    pub competitor_code: Option<String>,
    pub value: Option<String>,
}

impl RaceResultEntry {
    pub fn result_value(&self) -> ResultValue {
        ResultValue {
            competitor: self.competitor_code.as_deref().and_then(CompetitorCode::parse),
            text: self.value.clone(),
        }
    }
}

/// Builds the scoring view of a race result from stored rows.
///
/// Rows with an unknown category or an invalid rank are skipped, so a bad row
/// costs its own slot and nothing else.
pub fn build_race_result(entries: &[RaceResultEntry], has_sprint: bool) -> RaceResult {
    let mut result = RaceResult::new(has_sprint);
    for entry in entries {
        let Ok(category) = entry.category.parse::<RaceCategory>() else {
            warn!(category = %entry.category, "skipping result row with unknown category");
            continue;
        };
        let rank = match entry.rank.map(u8::try_from) {
            None => None,
            Some(Ok(rank)) => Some(rank),
            Some(Err(_)) => {
                warn!(%category, rank = ?entry.rank, "skipping result row with invalid rank");
                continue;
            }
        };
        result.insert(category, rank, entry.result_value());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str, rank: Option<i32>, code: Option<&str>, value: Option<&str>) -> RaceResultEntry {
        RaceResultEntry {
            result_id: Uuid::new_v4(),
            race_id: Uuid::nil(),
            category: category.to_string(),
            rank,
            competitor_code: code.map(str::to_string),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_build_race_result() {
        let rows = vec![
            entry("RACE", Some(1), Some("VER"), None),
            entry("RACE", Some(2), Some("LEC"), None),
            entry("SC", None, None, Some("3")),
            entry("QUALI", Some(1), None, None),
            entry("PODIUM", Some(1), Some("HAM"), None),
            entry("RACE", Some(-3), Some("HAM"), None),
        ];
        let result = build_race_result(&rows, true);

        assert!(result.has_sprint());
        assert_eq!(result.value(RaceCategory::Race, Some(1)), Some("VER"));
        assert_eq!(result.value(RaceCategory::Sc, None), Some("3"));
        assert_eq!(result.value(RaceCategory::Quali, None), None);
        assert_eq!(result.value(RaceCategory::Race, Some(3)), None);
    }
}
