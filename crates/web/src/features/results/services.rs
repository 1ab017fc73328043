use scoring::{RaceCategory, ResultValue};
use sqlx::PgPool;
use storage::{
    dto::result::{EvaluationResponse, RaceResultResponse},
    error::Result,
    repository::{race::RaceRepository, result::ResultRepository},
    services::evaluation,
};
use tracing::info;
use uuid::Uuid;

pub async fn get_result(pool: &PgPool, ext_id: &str) -> Result<RaceResultResponse> {
    let race = RaceRepository::new(pool).find_by_ext_id(ext_id).await?;
    let result = ResultRepository::new(pool).race_result(&race).await?;

    Ok(RaceResultResponse::new(&race, &result))
}

/// Load official result slots, then return the full stored result
pub async fn load_result(
    pool: &PgPool,
    ext_id: &str,
    entries: &[(RaceCategory, Option<u8>, ResultValue)],
) -> Result<RaceResultResponse> {
    let race = RaceRepository::new(pool).find_by_ext_id(ext_id).await?;
    let repo = ResultRepository::new(pool);

    let written = repo.upsert_entries(race.race_id, entries).await?;
    info!(race = %race.ext_id, written, "race result loaded");

    let result = repo.race_result(&race).await?;
    Ok(RaceResultResponse::new(&race, &result))
}

pub async fn evaluate_race(pool: &PgPool, ext_id: &str, verdicts: &[(Uuid, bool)]) -> Result<EvaluationResponse> {
    evaluation::evaluate_race(pool, ext_id, verdicts).await
}
