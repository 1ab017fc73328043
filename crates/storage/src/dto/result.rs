use scoring::{CompetitorCode, RaceCategory, RaceResult, ResultValue, ScoringError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Race;

/// One official result slot to load.
///
/// Driver categories read `code`; SC and BONUS read `value`. A slot with
/// neither is stored as not loaded.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResultEntryInput {
    #[validate(length(min = 1, max = 32, message = "Category is required"))]
    pub category: String,

    pub rank: Option<u8>,

    #[validate(length(max = 8))]
    pub code: Option<String>,

    #[validate(length(max = 255))]
    pub value: Option<String>,
}

impl ResultEntryInput {
    pub fn to_entry(&self) -> Result<(RaceCategory, Option<u8>, ResultValue), ScoringError> {
        let category: RaceCategory = self.category.parse()?;
        let rank = match (category.normalize_rank(self.rank), self.rank) {
            (Some(rank), _) => rank,
            (None, Some(rank)) if category.max_rank().is_some() => {
                return Err(ScoringError::RankOutOfRange {
                    category: category.to_string(),
                    rank,
                });
            }
            (None, Some(_)) => return Err(ScoringError::UnexpectedRank(category.to_string())),
            (None, None) => {
                return Err(ScoringError::RankOutOfRange {
                    category: category.to_string(),
                    rank: 0,
                });
            }
        };

        let value = if category.holds_competitor() {
            ResultValue {
                competitor: self
                    .code
                    .as_deref()
                    .or(self.value.as_deref())
                    .and_then(CompetitorCode::parse),
                text: None,
            }
        } else {
            ResultValue {
                competitor: None,
                text: self
                    .value
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string),
            }
        };

        Ok((category, rank, value))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoadResultRequest {
    #[validate(length(min = 1, message = "At least one entry is required"), nested)]
    pub entries: Vec<ResultEntryInput>,
}

impl LoadResultRequest {
    pub fn to_entries(&self) -> Result<Vec<(RaceCategory, Option<u8>, ResultValue)>, ScoringError> {
        self.entries.iter().map(ResultEntryInput::to_entry).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResultEntryView {
    pub category: String,
    pub rank: Option<u8>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaceResultResponse {
    pub race: String,
    pub has_sprint: bool,
    pub entries: Vec<ResultEntryView>,
}

impl RaceResultResponse {
    pub fn new(race: &Race, result: &RaceResult) -> Self {
        let entries = result
            .entries()
            .map(|(category, rank, value)| ResultEntryView {
                category: category.to_string(),
                rank,
                value: value.as_str().map(str::to_string),
            })
            .collect();

        Self {
            race: race.ext_id.clone(),
            has_sprint: result.has_sprint(),
            entries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BonusVerdictInput {
    pub user_id: Uuid,
    pub correct: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EvaluateRaceRequest {
    /// Verdicts to record before scoring; users left out keep their stored
    /// verdict.
    #[serde(default)]
    pub bonus_verdicts: Vec<BonusVerdictInput>,
}

impl EvaluateRaceRequest {
    pub fn verdicts(&self) -> Vec<(Uuid, bool)> {
        self.bonus_verdicts
            .iter()
            .map(|verdict| (verdict.user_id, verdict.correct))
            .collect()
    }
}

/// Outcome of an evaluation batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EvaluationResponse {
    pub users: usize,
    pub bets_written: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(category: &str, rank: Option<u8>, code: Option<&str>, value: Option<&str>) -> ResultEntryInput {
        ResultEntryInput {
            category: category.to_string(),
            rank,
            code: code.map(str::to_string),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_driver_and_text_entries() {
        let (category, rank, value) = input("RACE", Some(2), Some("lec"), None).to_entry().unwrap();
        assert_eq!(category, RaceCategory::Race);
        assert_eq!(rank, Some(2));
        assert_eq!(value.as_str(), Some("LEC"));

        let (_, rank, value) = input("SC", None, None, Some(" 2 ")).to_entry().unwrap();
        assert_eq!(rank, None);
        assert_eq!(value.as_str(), Some("2"));
        assert!(value.competitor.is_none());

        let (_, _, empty) = input("BONUS", None, None, Some("")).to_entry().unwrap();
        assert!(!empty.is_loaded());
    }

    #[test]
    fn test_invalid_slots() {
        assert!(matches!(
            input("RACE", Some(5), Some("VER"), None).to_entry(),
            Err(ScoringError::RankOutOfRange { rank: 5, .. })
        ));
        assert!(matches!(
            input("QUALI", Some(3), Some("VER"), None).to_entry(),
            Err(ScoringError::UnexpectedRank(_))
        ));
        assert!(input("LAPS", None, None, Some("57")).to_entry().is_err());
    }

    #[test]
    fn test_response_lists_loaded_entries() {
        let race = Race {
            race_id: Uuid::new_v4(),
            ext_id: "monza".to_string(),
            round: 16,
            name: "Italian Grand Prix".to_string(),
            country: "Italy".to_string(),
            circuit_name: "Autodromo Nazionale Monza".to_string(),
            quali_date: None,
            sprint_date: None,
            race_date: None,
            kind: "NORMAL".to_string(),
            bonus_question: None,
        };
        let result = RaceResult::new(false)
            .with_competitor(RaceCategory::Race, Some(1), "VER")
            .with_text(RaceCategory::Sc, None, "1");

        let response = RaceResultResponse::new(&race, &result);
        assert_eq!(response.race, "monza");
        assert_eq!(response.entries.len(), 2);
        assert!(!response.has_sprint);
    }
}
