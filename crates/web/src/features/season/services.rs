use chrono::{DateTime, Utc};
use scoring::{CompetitorCode, CompetitorKind, DuelRoster, SeasonBet, SeasonLock, StandingsEntry};
use sqlx::PgPool;
use storage::{
    dto::{
        result::EvaluationResponse,
        score::SeasonScoreResponse,
        season::{SeasonBetView, StandingsResponse},
    },
    error::Result,
    repository::{bet::BetRepository, user::UserRepository},
    services::{evaluation, live, standings, submission},
};
use uuid::Uuid;

/// Current standings of one kind; driver standings are adjusted when
/// `excluded` is not empty
pub async fn get_standings(
    pool: &PgPool,
    kind: CompetitorKind,
    excluded: &[CompetitorCode],
) -> Result<StandingsResponse> {
    let (table, competitors) = standings::load_standings(pool, kind, excluded).await?;
    let adjusted = kind == CompetitorKind::Driver && !excluded.is_empty();

    Ok(StandingsResponse::new(kind, adjusted, &table, &competitors))
}

pub async fn update_standings(
    pool: &PgPool,
    kind: CompetitorKind,
    entries: &[StandingsEntry],
) -> Result<StandingsResponse> {
    standings::update_standings(pool, kind, entries).await?;
    get_standings(pool, kind, &[]).await
}

pub async fn season_score(
    pool: &PgPool,
    user_id: Uuid,
    roster: &DuelRoster,
    excluded: &[CompetitorCode],
    season_lock: SeasonLock,
    now: DateTime<Utc>,
) -> Result<SeasonScoreResponse> {
    let score = live::season_score(pool, user_id, roster, excluded).await?;
    Ok(score.masked(season_lock, now))
}

/// Every user's season order, masked for `viewer` until the season locks
pub async fn season_bets(
    pool: &PgPool,
    viewer: Option<Uuid>,
    season_lock: SeasonLock,
    now: DateTime<Utc>,
) -> Result<Vec<SeasonBetView>> {
    let viewer = match viewer {
        Some(user_id) => Some(UserRepository::new(pool).find_by_id(user_id).await?),
        None => None,
    };
    let bets = BetRepository::new(pool).season_bets().await?;

    Ok(bets
        .iter()
        .filter_map(|bet| SeasonBetView::masked(bet, season_lock, now, viewer.as_ref()))
        .collect())
}

pub async fn submit_season_bets(
    pool: &PgPool,
    user_id: Uuid,
    lock: SeasonLock,
    bets: Vec<SeasonBet>,
) -> Result<Vec<SeasonBet>> {
    submission::submit_season_bets(pool, user_id, lock, bets).await
}

pub async fn evaluate_season(
    pool: &PgPool,
    roster: &DuelRoster,
    excluded: &[CompetitorCode],
) -> Result<EvaluationResponse> {
    evaluation::evaluate_season(pool, roster, excluded).await
}
