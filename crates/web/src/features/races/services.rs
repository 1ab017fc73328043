use chrono::{DateTime, Utc};
use scoring::{AcceptedRaceBets, RaceBet};
use sqlx::PgPool;
use storage::{
    dto::{
        race::{RaceBetView, RaceLocksResponse},
        score::RaceScoreResponse,
    },
    error::Result,
    models::Race,
    repository::{bet::BetRepository, race::RaceRepository, user::UserRepository},
    services::{live, submission},
};
use uuid::Uuid;

/// List all races in round order
pub async fn list_races(pool: &PgPool) -> Result<Vec<Race>> {
    let repo = RaceRepository::new(pool);
    repo.list().await
}

pub async fn get_race(pool: &PgPool, ext_id: &str) -> Result<Race> {
    let repo = RaceRepository::new(pool);
    repo.find_by_ext_id(ext_id).await
}

pub async fn current_race(pool: &PgPool, now: DateTime<Utc>) -> Result<Race> {
    let repo = RaceRepository::new(pool);
    repo.current(now).await
}

pub async fn race_locks(pool: &PgPool, ext_id: &str, now: DateTime<Utc>) -> Result<RaceLocksResponse> {
    let race = get_race(pool, ext_id).await?;
    Ok(RaceLocksResponse::new(&race, now))
}

/// All users' bets for a race, masked for `viewer`. Without a viewer only
/// locked categories are shown.
pub async fn race_bets(
    pool: &PgPool,
    ext_id: &str,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Vec<RaceBetView>> {
    let race = get_race(pool, ext_id).await?;
    let viewer = match viewer {
        Some(user_id) => Some(UserRepository::new(pool).find_by_id(user_id).await?),
        None => None,
    };

    let schedule = race.schedule();
    let bets = BetRepository::new(pool).race_bets(race.race_id).await?;

    Ok(bets
        .iter()
        .map(|bet| RaceBetView::masked(bet, &schedule, now, viewer.as_ref()))
        .collect())
}

pub async fn submit_race_bets(
    pool: &PgPool,
    ext_id: &str,
    user_id: Uuid,
    bets: Vec<RaceBet>,
    now: DateTime<Utc>,
) -> Result<AcceptedRaceBets> {
    submission::submit_race_bets(pool, ext_id, user_id, bets, now).await
}

pub async fn race_score(pool: &PgPool, ext_id: &str, user_id: Uuid) -> Result<RaceScoreResponse> {
    live::race_score(pool, ext_id, user_id).await
}
