use std::collections::BTreeMap;

use serde::Serialize;

use crate::bet::BetMarker;
use crate::season_scoring::DUEL_POINTS;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub user: String,
    pub points: f64,
}

/// Ranked tables for race bets, season bets and both combined.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Leaderboard {
    pub races: Vec<LeaderboardRow>,
    pub season: Vec<LeaderboardRow>,
    pub total: Vec<LeaderboardRow>,
}

/// Accumulates stored bet points per user.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardBuilder {
    races: BTreeMap<String, f64>,
    season: BTreeMap<String, f64>,
}

impl LeaderboardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure a user shows up even without any scored bet.
    pub fn add_user(&mut self, user: &str) {
        self.races.entry(user.to_string()).or_insert(0.0);
        self.season.entry(user.to_string()).or_insert(0.0);
    }

    pub fn add_race_points(&mut self, user: &str, points: f64) {
        self.add_user(user);
        *self.races.entry(user.to_string()).or_insert(0.0) += points;
    }

    /// Adds a stored season bet. A duel is annotated on both of its drivers'
    /// bets, so each `MATCH OK` row carries half of the duel points.
    pub fn add_season_bet(&mut self, user: &str, points: f64, marker: Option<BetMarker>) {
        self.add_user(user);
        let duel = if marker == Some(BetMarker::DuelHit) {
            DUEL_POINTS / 2.0
        } else {
            0.0
        };
        *self.season.entry(user.to_string()).or_insert(0.0) += points + duel;
    }

    pub fn build(self) -> Leaderboard {
        let total: BTreeMap<String, f64> = self
            .races
            .iter()
            .map(|(user, points)| {
                let season = self.season.get(user).copied().unwrap_or(0.0);
                (user.clone(), points + season)
            })
            .collect();

        Leaderboard {
            races: rank_rows(self.races),
            season: rank_rows(self.season),
            total: rank_rows(total),
        }
    }
}

/// Sorts by points descending; equal points share a rank and the next rank is
/// skipped (1, 1, 3).
fn rank_rows(points: BTreeMap<String, f64>) -> Vec<LeaderboardRow> {
    let mut rows: Vec<(String, f64)> = points.into_iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut ranked: Vec<LeaderboardRow> = Vec::with_capacity(rows.len());
    let mut position: u32 = 0;
    for (user, points) in rows {
        position = position.saturating_add(1);
        let rank = match ranked.last() {
            Some(previous) if previous.points == points => previous.rank,
            _ => position,
        };
        ranked.push(LeaderboardRow { rank, user, points });
    }
    ranked
}
