//! Scoring rules for the season tipping game.
//!
//! Everything in this crate is pure: callers hand in already-fetched results,
//! standings and bets and get point breakdowns back. Persistence and transport
//! live in the `storage` and `web` crates.

pub mod bet;
pub mod category;
pub mod code;
pub mod error;
pub mod leaderboard;
pub mod lock;
pub mod race_scoring;
pub mod result;
pub mod season_scoring;
pub mod standings;
pub mod submission;

pub use bet::{BetMarker, RaceBet, RaceBetSet, SeasonBet, SeasonBetSet};
pub use category::{Category, CompetitorKind, RaceCategory};
pub use code::CompetitorCode;
pub use error::{Result, ScoringError};
pub use leaderboard::{Leaderboard, LeaderboardBuilder, LeaderboardRow};
pub use lock::{LockScope, RaceSchedule, SeasonLock, check_lock};
pub use race_scoring::{RaceBreakdown, score_race};
pub use result::{RaceResult, ResultValue};
pub use season_scoring::{DuelOutcome, DuelPair, DuelRoster, SeasonBreakdown, score_season};
pub use standings::{StandingsEntry, StandingsTable};
pub use submission::{AcceptedRaceBets, MAX_JOKERS, validate_race_bets, validate_season_bets};
