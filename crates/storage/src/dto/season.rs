use chrono::{DateTime, Utc};
use scoring::{
    Category, CompetitorCode, CompetitorKind, LockScope, ScoringError, SeasonBet, SeasonLock, StandingsEntry,
    check_lock, lock,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Competitor, User, UserBet};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SeasonBetInput {
    /// `DRIVER` or `TEAM`.
    #[validate(length(min = 1, max = 32))]
    pub kind: String,

    #[validate(range(min = 1, max = 20))]
    pub rank: u8,

    #[validate(length(min = 1, max = 8, message = "Competitor code is required"))]
    pub code: String,
}

impl SeasonBetInput {
    pub fn to_season_bet(&self) -> Result<SeasonBet, ScoringError> {
        let kind: CompetitorKind = self.kind.parse()?;
        Ok(SeasonBet::new(kind, self.rank, self.code.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitSeasonBetsRequest {
    #[validate(length(min = 1, message = "At least one bet is required"), nested)]
    pub bets: Vec<SeasonBetInput>,
}

impl SubmitSeasonBetsRequest {
    pub fn to_season_bets(&self) -> Result<Vec<SeasonBet>, ScoringError> {
        self.bets.iter().map(SeasonBetInput::to_season_bet).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitSeasonBetsResponse {
    pub accepted: usize,
}

/// One slot of another user's season order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeasonBetView {
    pub username: String,
    pub kind: String,
    pub rank: Option<i32>,
    pub value: Option<String>,
    pub points: f64,
    /// Duel marker, hidden with the pick.
    pub marker: Option<String>,
}

impl SeasonBetView {
    /// `None` for rows that are not season bets. The pick is `LOCKED` until
    /// the season lock is set, unless the viewer owns it or is an admin.
    pub fn masked(bet: &UserBet, season_lock: SeasonLock, now: DateTime<Utc>, viewer: Option<&User>) -> Option<Self> {
        let kind = bet.bet.season_kind()?;
        let locked = check_lock(LockScope::Season(season_lock), Category::Season(kind), now);
        let owner = viewer.is_some_and(|viewer| viewer.user_id == bet.bet.user_id);
        let admin = viewer.is_some_and(User::is_admin);
        let visible = lock::can_reveal(locked, owner, admin);

        Some(Self {
            username: bet.username.clone(),
            kind: kind.to_string(),
            rank: bet.bet.rank,
            value: lock::reveal(bet.bet.value.as_deref(), locked, owner, admin).map(str::to_string),
            points: bet.bet.result,
            marker: visible.then(|| bet.bet.extra.clone()).flatten(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StandingsEntryInput {
    #[validate(range(min = 1, max = 100))]
    pub position: u32,

    #[validate(length(min = 1, max = 8))]
    pub code: String,

    #[validate(range(min = 0.0))]
    pub points: f64,
}

/// Snapshot of one championship, replacing the stored one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStandingsRequest {
    #[validate(length(min = 1, max = 32))]
    pub kind: String,

    #[validate(nested)]
    pub entries: Vec<StandingsEntryInput>,
}

impl UpdateStandingsRequest {
    pub fn competitor_kind(&self) -> Result<CompetitorKind, ScoringError> {
        self.kind.parse()
    }

    /// Entries with normalized codes; a code or position given twice is
    /// rejected.
    pub fn standings_entries(&self) -> Result<Vec<StandingsEntry>, ScoringError> {
        let mut entries: Vec<StandingsEntry> = Vec::with_capacity(self.entries.len());
        for input in &self.entries {
            let code = CompetitorCode::new(&input.code);
            if entries.iter().any(|entry| entry.code == code) {
                return Err(ScoringError::DuplicateCompetitor(code.to_string()));
            }
            if entries.iter().any(|entry| entry.position == input.position) {
                return Err(ScoringError::DuplicateBet(format!("position {}", input.position)));
            }
            entries.push(StandingsEntry::new(input.position, code, input.points));
        }
        Ok(entries)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StandingsRow {
    pub position: u32,
    pub code: String,
    pub name: Option<String>,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StandingsResponse {
    pub kind: String,
    /// Whether excluded drivers were dropped and positions re-ranked.
    pub adjusted: bool,
    pub entries: Vec<StandingsRow>,
}

impl StandingsResponse {
    /// Rows of a standings table, with display names looked up from the
    /// competitor list.
    pub fn new(
        kind: CompetitorKind,
        adjusted: bool,
        table: &scoring::StandingsTable,
        competitors: &[Competitor],
    ) -> Self {
        let entries = table
            .entries()
            .map(|entry| StandingsRow {
                position: entry.position,
                code: entry.code.to_string(),
                name: competitors
                    .iter()
                    .find(|competitor| CompetitorCode::new(&competitor.code) == entry.code)
                    .map(|competitor| competitor.name.clone()),
                points: entry.points,
            })
            .collect();

        Self {
            kind: kind.to_string(),
            adjusted,
            entries,
        }
    }
}
