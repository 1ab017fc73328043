use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bet::SeasonBetSet;
use crate::category::CompetitorKind;
use crate::code::CompetitorCode;
use crate::error::ScoringError;
use crate::standings::StandingsTable;

/// Predicted competitor holds exactly the predicted position.
pub const SLOT_HIT_POINTS: f64 = 2.0;
/// Relative order of two teammates called correctly.
pub const DUEL_POINTS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelPair {
    pub first: CompetitorCode,
    pub second: CompetitorCode,
}

/// Team → teammate pairing used for head-to-head duels.
///
/// Fixed for a season; parsed from `TEAM:A/B,TEAM:A/B`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuelRoster {
    pairs: BTreeMap<CompetitorCode, DuelPair>,
}

impl DuelRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(mut self, team: &str, first: &str, second: &str) -> Self {
        self.insert(team, first, second);
        self
    }

    pub fn insert(&mut self, team: &str, first: &str, second: &str) {
        self.pairs.insert(
            CompetitorCode::new(team),
            DuelPair {
                first: CompetitorCode::new(first),
                second: CompetitorCode::new(second),
            },
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompetitorCode, &DuelPair)> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromStr for DuelRoster {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut roster = Self::new();
        for entry in s.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let invalid = || ScoringError::InvalidRoster(entry.to_string());

            let (team, drivers) = entry.split_once(':').ok_or_else(invalid)?;
            let (first, second) = drivers.split_once('/').ok_or_else(invalid)?;
            let (team, first, second) = (team.trim(), first.trim(), second.trim());

            if team.is_empty() || first.is_empty() || second.is_empty() {
                return Err(invalid());
            }
            if CompetitorCode::new(first) == CompetitorCode::new(second) {
                return Err(invalid());
            }
            roster.insert(team, first, second);
        }
        Ok(roster)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuelOutcome {
    pub pair: DuelPair,
    pub predicted_first_ahead: bool,
    pub actual_first_ahead: bool,
    pub points: f64,
}

impl DuelOutcome {
    pub fn is_hit(&self) -> bool {
        self.predicted_first_ahead == self.actual_first_ahead
    }
}

/// Season points of one user.
///
/// Slot maps are dense: every rank of the kind is present. Duels only list
/// pairs that could be scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonBreakdown {
    pub drivers: BTreeMap<u8, f64>,
    pub teams: BTreeMap<u8, f64>,
    pub duels: BTreeMap<CompetitorCode, DuelOutcome>,
    pub total: f64,
}

impl SeasonBreakdown {
    pub fn slots(&self, kind: CompetitorKind) -> &BTreeMap<u8, f64> {
        match kind {
            CompetitorKind::Driver => &self.drivers,
            CompetitorKind::Team => &self.teams,
        }
    }

    pub fn slot_points(&self, kind: CompetitorKind, rank: u8) -> f64 {
        self.slots(kind).get(&rank).copied().unwrap_or(0.0)
    }

    pub fn kind_total(&self, kind: CompetitorKind) -> f64 {
        self.slots(kind).values().sum()
    }

    pub fn duels_total(&self) -> f64 {
        self.duels.values().map(|duel| duel.points).sum()
    }
}

/// Scores a user's season order and teammate duels against current standings.
///
/// A user without any season bet gets zero for every slot and no duels.
pub fn score_season(
    drivers: &StandingsTable,
    teams: &StandingsTable,
    bets: &SeasonBetSet,
    roster: &DuelRoster,
) -> SeasonBreakdown {
    let driver_slots = score_slots(CompetitorKind::Driver, drivers, bets);
    let team_slots = score_slots(CompetitorKind::Team, teams, bets);

    let duels: BTreeMap<CompetitorCode, DuelOutcome> = roster
        .iter()
        .filter_map(|(team, pair)| score_duel(pair, drivers, bets).map(|outcome| (team.clone(), outcome)))
        .collect();

    let total = driver_slots.values().sum::<f64>()
        + team_slots.values().sum::<f64>()
        + duels.values().map(|duel| duel.points).sum::<f64>();

    debug!(duels = duels.len(), total, "season scored");

    SeasonBreakdown {
        drivers: driver_slots,
        teams: team_slots,
        duels,
        total,
    }
}

fn score_slots(kind: CompetitorKind, standings: &StandingsTable, bets: &SeasonBetSet) -> BTreeMap<u8, f64> {
    (1..=kind.slots())
        .map(|rank| {
            let hit = bets
                .pick(kind, rank)
                .zip(standings.holder_at(u32::from(rank)))
                .is_some_and(|(predicted, holder)| predicted == holder);

            let points = match (hit, rank) {
                (true, 1) => SLOT_HIT_POINTS + kind.champion_bonus(),
                (true, _) => SLOT_HIT_POINTS,
                (false, _) => 0.0,
            };
            (rank, points)
        })
        .collect()
}

/// Scores one teammate duel, or `None` when it cannot be decided: either
/// driver is missing from the user's order or from the standings.
pub fn score_duel(pair: &DuelPair, standings: &StandingsTable, bets: &SeasonBetSet) -> Option<DuelOutcome> {
    let predicted_first = bets.predicted_rank(CompetitorKind::Driver, &pair.first)?;
    let predicted_second = bets.predicted_rank(CompetitorKind::Driver, &pair.second)?;
    let actual_first = standings.position_of(&pair.first)?;
    let actual_second = standings.position_of(&pair.second)?;

    let predicted_first_ahead = predicted_first < predicted_second;
    let actual_first_ahead = actual_first < actual_second;
    let points = if predicted_first_ahead == actual_first_ahead {
        DUEL_POINTS
    } else {
        0.0
    };

    Some(DuelOutcome {
        pair: pair.clone(),
        predicted_first_ahead,
        actual_first_ahead,
        points,
    })
}
