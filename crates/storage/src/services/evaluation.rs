use std::collections::BTreeMap;

use scoring::{
    BetMarker, CompetitorCode, CompetitorKind, DuelRoster, RaceBreakdown, SeasonBreakdown, score_race,
    score_season,
};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::dto::result::EvaluationResponse;
use crate::error::Result;
use crate::models::{Bet, UserBet, race_bet_set, season_bet_set};
use crate::repository::{bet::BetRepository, race::RaceRepository, result::ResultRepository};
use crate::services::standings::load_standings;

/// Scores every user's bets for one race and writes per-bet points.
///
/// Verdicts are recorded first. Previous points of the race are overwritten,
/// so the batch can be re-run after a result correction.
pub async fn evaluate_race(pool: &PgPool, ext_id: &str, verdicts: &[(Uuid, bool)]) -> Result<EvaluationResponse> {
    let race = RaceRepository::new(pool).find_by_ext_id(ext_id).await?;
    let bet_repo = BetRepository::new(pool);

    if !verdicts.is_empty() {
        let updated = bet_repo.set_bonus_verdicts(race.race_id, verdicts).await?;
        debug!(race = %race.ext_id, updated, "bonus verdicts recorded");
    }

    let result = ResultRepository::new(pool).race_result(&race).await?;
    let by_user = group_by_user(bet_repo.race_bets(race.race_id).await?);

    let mut points = Vec::new();
    for (user_id, bets) in &by_user {
        let breakdown = score_race(&result, &race_bet_set(bets));
        debug!(%user_id, total = breakdown.total, "race scored");
        points.extend(race_bet_points(bets, &breakdown));
    }

    let bets_written = bet_repo.store_race_points(race.race_id, &points).await?;
    info!(race = %race.ext_id, users = by_user.len(), bets_written, "race evaluated");

    Ok(EvaluationResponse {
        users: by_user.len(),
        bets_written,
    })
}

/// Scores every user's season order against current standings and writes
/// slot points and duel markers, replacing earlier ones.
pub async fn evaluate_season(
    pool: &PgPool,
    roster: &DuelRoster,
    excluded: &[CompetitorCode],
) -> Result<EvaluationResponse> {
    let (drivers, _) = load_standings(pool, CompetitorKind::Driver, excluded).await?;
    let (teams, _) = load_standings(pool, CompetitorKind::Team, &[]).await?;
    let bet_repo = BetRepository::new(pool);
    let by_user = group_by_user(bet_repo.season_bets().await?);

    let mut points = Vec::new();
    for (user_id, bets) in &by_user {
        let breakdown = score_season(&drivers, &teams, &season_bet_set(bets), roster);
        debug!(%user_id, total = breakdown.total, "season scored");
        points.extend(season_bet_points(bets, &breakdown));
    }

    let bets_written = bet_repo.store_season_points(&points).await?;
    info!(users = by_user.len(), bets_written, "season evaluated");

    Ok(EvaluationResponse {
        users: by_user.len(),
        bets_written,
    })
}

fn group_by_user(bets: Vec<UserBet>) -> BTreeMap<Uuid, Vec<Bet>> {
    let mut by_user: BTreeMap<Uuid, Vec<Bet>> = BTreeMap::new();
    for UserBet { bet, .. } in bets {
        by_user.entry(bet.user_id).or_default().push(bet);
    }
    by_user
}

/// Points owed to each stored race bet. Rows the scorer ignores (unknown
/// category, invalid rank) get 0.
pub fn race_bet_points(bets: &[Bet], breakdown: &RaceBreakdown) -> Vec<(Uuid, f64)> {
    bets.iter()
        .map(|bet| {
            let points = bet
                .to_race_bet()
                .and_then(|race_bet| {
                    let rank = race_bet.category.normalize_rank(race_bet.rank)?;
                    Some(breakdown.bet_points(race_bet.category, rank))
                })
                .unwrap_or(0.0);
            (bet.bet_id, points)
        })
        .collect()
}

/// Points and duel marker owed to each stored season bet.
///
/// Only the bet the scorer used for a slot is credited. Driver bets of a
/// scored duel carry `MATCH OK` or `MATCH NOT OK`.
pub fn season_bet_points(bets: &[Bet], breakdown: &SeasonBreakdown) -> Vec<(Uuid, f64, Option<BetMarker>)> {
    let set = season_bet_set(bets);

    bets.iter()
        .map(|bet| {
            let Some(season_bet) = bet.to_season_bet() else {
                return (bet.bet_id, 0.0, None);
            };

            let points = if set.pick(season_bet.kind, season_bet.rank) == Some(&season_bet.code) {
                breakdown.slot_points(season_bet.kind, season_bet.rank)
            } else {
                0.0
            };

            let marker = match season_bet.kind {
                CompetitorKind::Driver => breakdown
                    .duels
                    .values()
                    .find(|duel| duel.pair.first == season_bet.code || duel.pair.second == season_bet.code)
                    .map(|duel| BetMarker::for_duel(duel.is_hit())),
                CompetitorKind::Team => None,
            };

            (bet.bet_id, points, marker)
        })
        .collect()
}
