use scoring::{CompetitorCode, CompetitorKind, DuelRoster, score_race, score_season};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::score::{RaceScoreResponse, SeasonScoreResponse};
use crate::error::Result;
use crate::models::{race_bet_set, season_bet_set};
use crate::repository::{
    bet::BetRepository, race::RaceRepository, result::ResultRepository, user::UserRepository,
};
use crate::services::standings::load_standings;

/// Scores one user's race bets against whatever result is loaded now.
pub async fn race_score(pool: &PgPool, ext_id: &str, user_id: Uuid) -> Result<RaceScoreResponse> {
    let race = RaceRepository::new(pool).find_by_ext_id(ext_id).await?;
    UserRepository::new(pool).find_by_id(user_id).await?;

    let result = ResultRepository::new(pool).race_result(&race).await?;
    let bets = BetRepository::new(pool)
        .race_bets_for_user(user_id, race.race_id)
        .await?;
    let breakdown = score_race(&result, &race_bet_set(&bets));

    Ok(RaceScoreResponse::new(&race.ext_id, user_id, &breakdown))
}

/// Scores one user's season order against the current standings.
pub async fn season_score(
    pool: &PgPool,
    user_id: Uuid,
    roster: &DuelRoster,
    excluded: &[CompetitorCode],
) -> Result<SeasonScoreResponse> {
    UserRepository::new(pool).find_by_id(user_id).await?;

    let (drivers, _) = load_standings(pool, CompetitorKind::Driver, excluded).await?;
    let (teams, _) = load_standings(pool, CompetitorKind::Team, &[]).await?;
    let bets = BetRepository::new(pool).season_bets_for_user(user_id).await?;
    let breakdown = score_season(&drivers, &teams, &season_bet_set(&bets), roster);

    Ok(SeasonScoreResponse::new(user_id, &breakdown))
}
