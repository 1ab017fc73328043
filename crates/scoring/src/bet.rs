use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{CompetitorKind, RaceCategory};
use crate::code::CompetitorCode;
use crate::error::ScoringError;

/// Annotation stored in the `extra` column of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetMarker {
    #[serde(rename = "JOKER")]
    Joker,
    #[serde(rename = "MATCH OK")]
    DuelHit,
    #[serde(rename = "MATCH NOT OK")]
    DuelMiss,
}

impl BetMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Joker => "JOKER",
            Self::DuelHit => "MATCH OK",
            Self::DuelMiss => "MATCH NOT OK",
        }
    }

    pub fn for_duel(hit: bool) -> Self {
        if hit { Self::DuelHit } else { Self::DuelMiss }
    }
}

impl fmt::Display for BetMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetMarker {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JOKER" => Ok(Self::Joker),
            "MATCH OK" => Ok(Self::DuelHit),
            "MATCH NOT OK" => Ok(Self::DuelMiss),
            other => Err(ScoringError::UnknownMarker(other.to_string())),
        }
    }
}

/// One prediction for a race weekend slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceBet {
    pub category: RaceCategory,
    pub rank: Option<u8>,
    pub value: Option<String>,
    pub marker: Option<BetMarker>,
}

impl RaceBet {
    pub fn new(category: RaceCategory, rank: Option<u8>, value: impl Into<String>) -> Self {
        Self {
            category,
            rank,
            value: Some(value.into()),
            marker: None,
        }
    }

    pub fn with_joker(mut self) -> Self {
        self.marker = Some(BetMarker::Joker);
        self
    }

    /// Only the winner pick of the podium can carry the joker.
    pub fn is_joker_slot(&self) -> bool {
        self.category == RaceCategory::Race && self.rank == Some(1)
    }

    pub fn is_joker(&self) -> bool {
        self.is_joker_slot() && self.marker == Some(BetMarker::Joker)
    }

    /// Predicted value, `None` for an empty form field.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().map(str::trim).filter(|value| !value.is_empty())
    }

    pub fn code(&self) -> Option<CompetitorCode> {
        self.value().and_then(CompetitorCode::parse)
    }
}

/// A user's bets for one race plus the admin verdict on the bonus question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceBetSet {
    bets: Vec<RaceBet>,
    bonus_correct: bool,
}

impl RaceBetSet {
    pub fn new(bets: Vec<RaceBet>) -> Self {
        Self {
            bets,
            bonus_correct: false,
        }
    }

    pub fn with_bonus_verdict(mut self, correct: bool) -> Self {
        self.bonus_correct = correct;
        self
    }

    pub fn bonus_correct(&self) -> bool {
        self.bonus_correct
    }

    /// First bet stored for the slot; later duplicates are ignored.
    pub fn bet(&self, category: RaceCategory, rank: Option<u8>) -> Option<&RaceBet> {
        let rank = category.normalize_rank(rank)?;
        self.bets
            .iter()
            .find(|bet| bet.category == category && category.normalize_rank(bet.rank) == Some(rank))
    }

    pub fn joker_applied(&self) -> bool {
        self.bet(RaceCategory::Race, Some(1))
            .is_some_and(|bet| bet.marker == Some(BetMarker::Joker))
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }
}

/// One slot of a full-season order prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonBet {
    pub kind: CompetitorKind,
    pub rank: u8,
    pub code: CompetitorCode,
}

impl SeasonBet {
    pub fn new(kind: CompetitorKind, rank: u8, code: impl Into<CompetitorCode>) -> Self {
        Self {
            kind,
            rank,
            code: code.into(),
        }
    }
}

/// A user's season order, rank → predicted competitor per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonBetSet {
    drivers: BTreeMap<u8, CompetitorCode>,
    teams: BTreeMap<u8, CompetitorCode>,
}

impl SeasonBetSet {
    /// Collects season bets, skipping ranks outside the kind's slot range and
    /// keeping the first bet seen for a rank.
    pub fn from_bets(bets: impl IntoIterator<Item = SeasonBet>) -> Self {
        let mut set = Self::default();
        for bet in bets {
            if !bet.kind.accepts_rank(bet.rank) {
                debug!(kind = %bet.kind, rank = bet.rank, "ignoring season bet outside slot range");
                continue;
            }
            set.slots_mut(bet.kind).entry(bet.rank).or_insert(bet.code);
        }
        set
    }

    fn slots(&self, kind: CompetitorKind) -> &BTreeMap<u8, CompetitorCode> {
        match kind {
            CompetitorKind::Driver => &self.drivers,
            CompetitorKind::Team => &self.teams,
        }
    }

    fn slots_mut(&mut self, kind: CompetitorKind) -> &mut BTreeMap<u8, CompetitorCode> {
        match kind {
            CompetitorKind::Driver => &mut self.drivers,
            CompetitorKind::Team => &mut self.teams,
        }
    }

    pub fn pick(&self, kind: CompetitorKind, rank: u8) -> Option<&CompetitorCode> {
        self.slots(kind).get(&rank)
    }

    /// Rank at which the user placed `code`, the best one if placed twice.
    pub fn predicted_rank(&self, kind: CompetitorKind, code: &CompetitorCode) -> Option<u8> {
        self.slots(kind)
            .iter()
            .find(|(_, picked)| *picked == code)
            .map(|(rank, _)| *rank)
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty() && self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_parsing() {
        assert_eq!("joker".parse::<BetMarker>(), Ok(BetMarker::Joker));
        assert_eq!("MATCH NOT OK".parse::<BetMarker>(), Ok(BetMarker::DuelMiss));
        assert!("DOUBLE".parse::<BetMarker>().is_err());
    }

    #[test]
    fn test_joker_only_counts_on_winner_slot() {
        let quali = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Quali, None, "VER").with_joker()]);
        assert!(!quali.joker_applied());

        let second = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Race, Some(2), "VER").with_joker()]);
        assert!(!second.joker_applied());

        let winner = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Race, Some(1), "VER").with_joker()]);
        assert!(winner.joker_applied());
    }

    #[test]
    fn test_blank_bet_has_no_value() {
        let bet = RaceBet::new(RaceCategory::Fastest, None, " ");
        assert_eq!(bet.value(), None);
        assert_eq!(bet.code(), None);
    }

    #[test]
    fn test_season_set_ignores_out_of_range() {
        let set = SeasonBetSet::from_bets(vec![
            SeasonBet::new(CompetitorKind::Team, 1, "MCL"),
            SeasonBet::new(CompetitorKind::Team, 11, "FER"),
            SeasonBet::new(CompetitorKind::Driver, 0, "NOR"),
        ]);

        assert_eq!(set.pick(CompetitorKind::Team, 1), Some(&CompetitorCode::new("MCL")));
        assert_eq!(set.predicted_rank(CompetitorKind::Team, &CompetitorCode::new("FER")), None);
        assert_eq!(set.predicted_rank(CompetitorKind::Driver, &CompetitorCode::new("NOR")), None);
    }
}
