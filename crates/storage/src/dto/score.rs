use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use scoring::{Category, CompetitorKind, LockScope, RaceBreakdown, SeasonBreakdown, SeasonLock, check_lock};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Live breakdown of one user's race weekend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaceScoreResponse {
    pub race: String,
    pub user_id: Uuid,
    pub categories: BTreeMap<String, f64>,
    /// Per podium step, before the joker.
    pub podium: BTreeMap<String, f64>,
    pub joker: bool,
    pub total: f64,
}

impl RaceScoreResponse {
    pub fn new(race: &str, user_id: Uuid, breakdown: &RaceBreakdown) -> Self {
        Self {
            race: race.to_string(),
            user_id,
            categories: breakdown
                .categories
                .iter()
                .map(|(category, points)| (category.to_string(), *points))
                .collect(),
            podium: breakdown
                .podium
                .iter()
                .map(|(rank, points)| (rank.to_string(), *points))
                .collect(),
            joker: breakdown.joker,
            total: breakdown.total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlotScore {
    pub rank: u8,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DuelScore {
    pub team: String,
    pub first: String,
    pub second: String,
    pub predicted_first_ahead: bool,
    pub actual_first_ahead: bool,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeasonScoreResponse {
    pub user_id: Uuid,
    /// False while season bets are open; slots and duels are left out then.
    pub revealed: bool,
    pub drivers: Vec<SlotScore>,
    pub teams: Vec<SlotScore>,
    pub duels: Vec<DuelScore>,
    pub total: f64,
}

impl SeasonScoreResponse {
    pub fn new(user_id: Uuid, breakdown: &SeasonBreakdown) -> Self {
        let slots = |slots: &BTreeMap<u8, f64>| -> Vec<SlotScore> {
            slots
                .iter()
                .map(|(rank, points)| SlotScore {
                    rank: *rank,
                    points: *points,
                })
                .collect()
        };

        Self {
            user_id,
            revealed: true,
            drivers: slots(&breakdown.drivers),
            teams: slots(&breakdown.teams),
            duels: breakdown
                .duels
                .iter()
                .map(|(team, duel)| DuelScore {
                    team: team.to_string(),
                    first: duel.pair.first.to_string(),
                    second: duel.pair.second.to_string(),
                    predicted_first_ahead: duel.predicted_first_ahead,
                    actual_first_ahead: duel.actual_first_ahead,
                    points: duel.points,
                })
                .collect(),
            total: breakdown.total,
        }
    }

    /// Keeps only the total until the season lock is set, since slot points
    /// and duels give away the predicted order.
    pub fn masked(self, season_lock: SeasonLock, now: DateTime<Utc>) -> Self {
        let locked = check_lock(
            LockScope::Season(season_lock),
            Category::Season(CompetitorKind::Driver),
            now,
        );
        if locked {
            return self;
        }

        Self {
            revealed: false,
            drivers: Vec::new(),
            teams: Vec::new(),
            duels: Vec::new(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring::{
        CompetitorKind, DuelRoster, RaceBet, RaceBetSet, RaceCategory, RaceResult, SeasonBet, SeasonBetSet,
        StandingsEntry, StandingsTable, score_race, score_season,
    };

    #[test]
    fn test_race_score_keys() {
        let result = RaceResult::new(false)
            .with_competitor(RaceCategory::Race, Some(1), "VER")
            .with_competitor(RaceCategory::Race, Some(2), "LEC")
            .with_competitor(RaceCategory::Race, Some(3), "HAM");
        let bets = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Race, Some(1), "VER")]);
        let breakdown = score_race(&result, &bets);

        let response = RaceScoreResponse::new("imola", Uuid::nil(), &breakdown);
        assert_eq!(response.categories.get("RACE"), Some(&2.0));
        assert_eq!(response.podium.get("1"), Some(&2.0));
        assert!(!response.categories.contains_key("SPRINT"));
        assert_eq!(response.total, breakdown.total);
    }

    #[test]
    fn test_season_score_is_dense() {
        let drivers = StandingsTable::new(vec![
            StandingsEntry::new(1, "PIA", 300.0),
            StandingsEntry::new(2, "NOR", 290.0),
        ]);
        let teams = StandingsTable::new(vec![StandingsEntry::new(1, "MCL", 590.0)]);
        let bets = SeasonBetSet::from_bets(vec![
            SeasonBet::new(CompetitorKind::Driver, 1, "NOR"),
            SeasonBet::new(CompetitorKind::Driver, 2, "PIA"),
        ]);
        let roster = DuelRoster::new().with_pair("MCL", "NOR", "PIA");
        let breakdown = score_season(&drivers, &teams, &bets, &roster);

        let response = SeasonScoreResponse::new(Uuid::nil(), &breakdown);
        assert_eq!(response.drivers.len(), 20);
        assert_eq!(response.teams.len(), 10);
        assert_eq!(response.duels.len(), 1);
        assert_eq!(response.duels[0].team, "MCL");
        assert_eq!(response.duels[0].points, 0.0);
        assert_eq!(response.total, 0.0);
    }

    #[test]
    fn test_season_score_hides_picks_while_open() {
        let drivers = StandingsTable::new(vec![
            StandingsEntry::new(1, "PIA", 300.0),
            StandingsEntry::new(2, "NOR", 290.0),
        ]);
        let teams = StandingsTable::new(vec![StandingsEntry::new(1, "MCL", 590.0)]);
        let bets = SeasonBetSet::from_bets(vec![SeasonBet::new(CompetitorKind::Driver, 1, "PIA")]);
        let roster = DuelRoster::new().with_pair("MCL", "NOR", "PIA");
        let breakdown = score_season(&drivers, &teams, &bets, &roster);
        let now = chrono::Utc::now();

        let open = SeasonScoreResponse::new(Uuid::nil(), &breakdown).masked(SeasonLock::new(false), now);
        assert!(!open.revealed);
        assert!(open.drivers.is_empty());
        assert!(open.teams.is_empty());
        assert!(open.duels.is_empty());
        assert_eq!(open.total, breakdown.total);

        let locked = SeasonScoreResponse::new(Uuid::nil(), &breakdown).masked(SeasonLock::new(true), now);
        assert!(locked.revealed);
        assert_eq!(locked.drivers.len(), 20);
        assert_eq!(locked.duels.len(), 1);
    }
}
