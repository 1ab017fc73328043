use axum::{Json, extract::State};
use storage::{Database, dto::leaderboard::LeaderboardResponse};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    responses(
        (status = 200, description = "RACES, SEASON and TOTAL tables from the last evaluations", body = LeaderboardResponse)
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(State(db): State<Database>) -> Result<Json<LeaderboardResponse>, WebError> {
    let board = services::get_leaderboard(db.pool()).await?;

    Ok(Json(LeaderboardResponse::from(board)))
}
