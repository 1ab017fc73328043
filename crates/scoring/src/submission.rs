use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::bet::{RaceBet, SeasonBet};
use crate::category::RaceCategory;
use crate::error::{Result, ScoringError};
use crate::lock::{RaceSchedule, SeasonLock};

/// Jokers a user may spend over one season.
pub const MAX_JOKERS: usize = 3;

/// Race bets that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedRaceBets {
    pub bets: Vec<RaceBet>,
    /// Categories left untouched because their gate has passed.
    pub skipped: Vec<RaceCategory>,
}

impl AcceptedRaceBets {
    pub fn joker(&self) -> bool {
        self.bets.iter().any(RaceBet::is_joker)
    }
}

/// Validates a race submission before it is written.
///
/// Bets for locked categories are dropped and reported in `skipped`; the rest
/// is rejected as a whole when a slot is invalid or duplicated, a sprint bet is
/// placed on a normal weekend, a marker sits outside the winner slot, or the
/// joker would exceed [`MAX_JOKERS`]. `jokers_used_elsewhere` counts jokers on
/// the user's other races.
pub fn validate_race_bets(
    schedule: &RaceSchedule,
    has_sprint: bool,
    bets: Vec<RaceBet>,
    jokers_used_elsewhere: usize,
    now: DateTime<Utc>,
) -> Result<AcceptedRaceBets> {
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(bets.len());
    let mut skipped = Vec::new();

    for mut bet in bets {
        let category = bet.category;
        bet.rank = match (category.normalize_rank(bet.rank), bet.rank) {
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

        if !seen.insert((category, bet.rank)) {
            return Err(ScoringError::DuplicateBet(category.slot_label(bet.rank)));
        }
        if category == RaceCategory::Sprint && !has_sprint {
            return Err(ScoringError::NoSprint);
        }
        if let Some(marker) = bet.marker
            && !bet.is_joker()
        {
            return Err(ScoringError::MarkerNotAllowed {
                marker: marker.to_string(),
                slot: category.slot_label(bet.rank),
            });
        }

        if schedule.is_locked(category, now) {
            debug!(%category, "skipping bet for locked category");
            if !skipped.contains(&category) {
                skipped.push(category);
            }
            continue;
        }
        accepted.push(bet);
    }

    let accepted = AcceptedRaceBets {
        bets: accepted,
        skipped,
    };
    if accepted.joker() && jokers_used_elsewhere >= MAX_JOKERS {
        return Err(ScoringError::JokerCapExceeded { max: MAX_JOKERS });
    }

    Ok(accepted)
}

/// Validates a full or partial season order.
///
/// Rejected when the season is locked, a rank is outside the kind's slots, or
/// a rank or competitor appears twice within a kind.
pub fn validate_season_bets(lock: SeasonLock, bets: Vec<SeasonBet>) -> Result<Vec<SeasonBet>> {
    if lock.is_locked() {
        return Err(ScoringError::SeasonLocked);
    }

    let mut ranks = HashSet::new();
    let mut codes = HashSet::new();
    for bet in &bets {
        if !bet.kind.accepts_rank(bet.rank) {
            return Err(ScoringError::RankOutOfRange {
                category: bet.kind.season_bet_type().to_string(),
                rank: bet.rank,
            });
        }
        if !ranks.insert((bet.kind, bet.rank)) {
            return Err(ScoringError::DuplicateBet(format!(
                "{} {}",
                bet.kind.season_bet_type(),
                bet.rank
            )));
        }
        if !codes.insert((bet.kind, bet.code.clone())) {
            return Err(ScoringError::DuplicateCompetitor(bet.code.to_string()));
        }
    }

    Ok(bets)
}
