use chrono::{DateTime, Utc};
use scoring::{
    AcceptedRaceBets, CompetitorCode, CompetitorKind, RaceBet, SeasonBet, SeasonLock, validate_race_bets,
    validate_season_bets,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::repository::{
    bet::BetRepository, competitor::CompetitorRepository, race::RaceRepository, user::UserRepository,
};

/// Validates and stores a user's race bets.
///
/// Locked categories are left untouched and reported back in the result.
pub async fn submit_race_bets(
    pool: &PgPool,
    ext_id: &str,
    user_id: Uuid,
    bets: Vec<RaceBet>,
    now: DateTime<Utc>,
) -> Result<AcceptedRaceBets> {
    let race = RaceRepository::new(pool).find_by_ext_id(ext_id).await?;
    let schedule = race.schedule();

    let (accepted, written) = BetRepository::new(pool)
        .store_race_bets(user_id, race.race_id, |jokers_used| {
            validate_race_bets(&schedule, race.has_sprint(), bets, jokers_used, now)
        })
        .await?;
    info!(
        race = %race.ext_id,
        %user_id,
        written,
        skipped = accepted.skipped.len(),
        "race bets stored"
    );

    Ok(accepted)
}

/// Validates and stores a user's season order. Every code must name a known
/// competitor of the right kind.
pub async fn submit_season_bets(
    pool: &PgPool,
    user_id: Uuid,
    lock: SeasonLock,
    bets: Vec<SeasonBet>,
) -> Result<Vec<SeasonBet>> {
    let bets = validate_season_bets(lock, bets)?;
    UserRepository::new(pool).find_by_id(user_id).await?;

    let competitor_repo = CompetitorRepository::new(pool);
    for kind in CompetitorKind::ALL {
        if !bets.iter().any(|bet| bet.kind == kind) {
            continue;
        }
        let known: Vec<CompetitorCode> = competitor_repo
            .list_by_kind(kind)
            .await?
            .iter()
            .map(|competitor| CompetitorCode::new(&competitor.code))
            .collect();
        if let Some(unknown) = bets.iter().find(|bet| bet.kind == kind && !known.contains(&bet.code)) {
            return Err(StorageError::InvalidData(format!(
                "unknown {} code '{}'",
                kind.as_str().to_lowercase(),
                unknown.code
            )));
        }
    }

    let written = BetRepository::new(pool)
        .replace_season_bets(user_id, &bets)
        .await?;
    info!(%user_id, written, "season bets stored");

    Ok(bets)
}
