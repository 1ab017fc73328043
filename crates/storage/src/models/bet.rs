use chrono::{DateTime, Utc};
use scoring::{
    BetMarker, Category, CompetitorCode, CompetitorKind, RaceBet, RaceBetSet, RaceCategory, SeasonBet, SeasonBetSet,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Stored prediction. `race_id` is null for season bets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Bet {
    pub bet_id: Uuid,
    pub user_id: Uuid,
    pub race_id: Option<Uuid>,
    pub category: String,
    pub rank: Option<i32>,
    pub value: Option<String>,
    pub result: f64,
    pub extra: Option<String>,
    pub is_correct: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl Bet {
    pub fn category(&self) -> Option<Category> {
        Category::from_bet_type(&self.category).ok()
    }

    pub fn marker(&self) -> Option<BetMarker> {
        self.extra.as_deref().and_then(|extra| extra.parse().ok())
    }

    fn rank_u8(&self) -> Option<Option<u8>> {
        match self.rank {
            None => Some(None),
            Some(rank) => u8::try_from(rank).ok().map(Some),
        }
    }

    /// Scoring view of a race bet; `None` for season bets and unreadable rows.
    pub fn to_race_bet(&self) -> Option<RaceBet> {
        let Some(Category::Race(category)) = self.category() else {
            return None;
        };
        Some(RaceBet {
            category,
            rank: self.rank_u8()?,
            value: self.value.clone(),
            marker: self.marker(),
        })
    }

    /// Scoring view of a season bet; `None` for race bets, empty picks and
    /// unreadable rows.
    pub fn to_season_bet(&self) -> Option<SeasonBet> {
        let Some(Category::Season(kind)) = self.category() else {
            return None;
        };
        Some(SeasonBet {
            kind,
            rank: self.rank_u8()??,
            code: self.value.as_deref().and_then(CompetitorCode::parse)?,
        })
    }

    pub fn race_category(&self) -> Option<RaceCategory> {
        match self.category() {
            Some(Category::Race(category)) => Some(category),
            _ => None,
        }
    }

    pub fn season_kind(&self) -> Option<CompetitorKind> {
        match self.category() {
            Some(Category::Season(kind)) => Some(kind),
            _ => None,
        }
    }

    pub fn is_bonus(&self) -> bool {
        self.race_category() == Some(RaceCategory::Bonus)
    }
}

/// Scoring view of one user's stored race bets, bonus verdict included.
pub fn race_bet_set(bets: &[Bet]) -> RaceBetSet {
    let bonus_correct = bets
        .iter()
        .any(|bet| bet.is_bonus() && bet.is_correct == Some(true));
    RaceBetSet::new(bets.iter().filter_map(Bet::to_race_bet).collect()).with_bonus_verdict(bonus_correct)
}

pub fn season_bet_set(bets: &[Bet]) -> SeasonBetSet {
    SeasonBetSet::from_bets(bets.iter().filter_map(Bet::to_season_bet))
}

/// A bet joined with its owner's name, for overviews and leaderboards.
#[derive(Debug, Clone, FromRow)]
pub struct UserBet {
    pub username: String,
    #[sqlx(flatten)]
    pub bet: Bet,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bet(category: &str, rank: Option<i32>, value: Option<&str>, extra: Option<&str>) -> Bet {
        Bet {
            bet_id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            race_id: None,
            category: category.to_string(),
            rank,
            value: value.map(str::to_string),
            result: 0.0,
            extra: extra.map(str::to_string),
            is_correct: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_race_bet_conversion() {
        let race_bet = bet("RACE", Some(1), Some("VER"), Some("JOKER")).to_race_bet().unwrap();
        assert!(race_bet.is_joker());

        assert!(bet("SEASON_DRIVER", Some(1), Some("VER"), None).to_race_bet().is_none());
        assert!(bet("RACE", Some(300), Some("VER"), None).to_race_bet().is_none());
        assert!(bet("WHATEVER", None, Some("VER"), None).to_race_bet().is_none());
    }

    #[test]
    fn test_season_bet_conversion() {
        let season_bet = bet("SEASON_TEAM", Some(2), Some("fer"), Some("MATCH OK"))
            .to_season_bet()
            .unwrap();
        assert_eq!(season_bet.kind, CompetitorKind::Team);
        assert_eq!(season_bet.rank, 2);
        assert_eq!(season_bet.code.as_str(), "FER");

        assert!(bet("SEASON_DRIVER", None, Some("VER"), None).to_season_bet().is_none());
        assert!(bet("SEASON_DRIVER", Some(3), None, None).to_season_bet().is_none());
        assert!(bet("QUALI", None, Some("VER"), None).to_season_bet().is_none());
    }

    #[test]
    fn test_race_bet_set_reads_bonus_verdict() {
        let mut bonus = bet("BONUS", None, Some("Yes"), None);
        let winner = bet("RACE", Some(1), Some("VER"), Some("JOKER"));

        let pending = race_bet_set(&[winner.clone(), bonus.clone()]);
        assert!(!pending.bonus_correct());
        assert!(pending.joker_applied());

        bonus.is_correct = Some(true);
        assert!(race_bet_set(&[winner, bonus]).bonus_correct());
    }

    #[test]
    fn test_season_bet_set_skips_race_rows() {
        let set = season_bet_set(&[
            bet("SEASON_DRIVER", Some(1), Some("NOR"), None),
            bet("RACE", Some(1), Some("VER"), None),
        ]);
        assert_eq!(set.pick(CompetitorKind::Driver, 1).map(CompetitorCode::as_str), Some("NOR"));
    }

    #[test]
    fn test_marker() {
        assert_eq!(bet("SEASON_DRIVER", Some(1), None, Some("MATCH OK")).marker(), Some(BetMarker::DuelHit));
        assert_eq!(bet("RACE", Some(1), None, Some("junk")).marker(), None);
    }
}
