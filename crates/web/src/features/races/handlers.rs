use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    Database,
    dto::{
        race::{RaceBetView, RaceLocksResponse, RaceResponse, SubmitRaceBetsRequest, SubmitRaceBetsResponse},
        score::RaceScoreResponse,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/races",
    responses(
        (status = 200, description = "List all races of the season", body = Vec<RaceResponse>)
    ),
    tag = "races"
)]
pub async fn list_races(State(db): State<Database>) -> Result<Json<Vec<RaceResponse>>, WebError> {
    let races = services::list_races(db.pool()).await?;

    let response: Vec<RaceResponse> = races.into_iter().map(RaceResponse::from).collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/races/current",
    responses(
        (status = 200, description = "Race currently open for bets, or the last one", body = RaceResponse),
        (status = 404, description = "No race scheduled")
    ),
    tag = "races"
)]
pub async fn current_race(State(db): State<Database>) -> Result<Response, WebError> {
    let race = services::current_race(db.pool(), Utc::now()).await?;

    Ok(Json(RaceResponse::from(race)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/races/{ext_id}",
    params(
        ("ext_id" = String, Path, description = "Circuit identifier")
    ),
    responses(
        (status = 200, description = "Race found", body = RaceResponse),
        (status = 404, description = "Race not found")
    ),
    tag = "races"
)]
pub async fn get_race(State(db): State<Database>, Path(ext_id): Path<String>) -> Result<Response, WebError> {
    let race = services::get_race(db.pool(), &ext_id).await?;

    Ok(Json(RaceResponse::from(race)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/races/{ext_id}/locks",
    params(
        ("ext_id" = String, Path, description = "Circuit identifier")
    ),
    responses(
        (status = 200, description = "Lock state per category", body = RaceLocksResponse),
        (status = 404, description = "Race not found")
    ),
    tag = "races"
)]
pub async fn race_locks(State(db): State<Database>, Path(ext_id): Path<String>) -> Result<Response, WebError> {
    let locks = services::race_locks(db.pool(), &ext_id, Utc::now()).await?;

    Ok(Json(locks).into_response())
}

#[utoipa::path(
    get,
    path = "/api/races/{ext_id}/bets",
    params(
        ("ext_id" = String, Path, description = "Circuit identifier")
    ),
    responses(
        (status = 200, description = "Every user's bets, masked until locked", body = Vec<RaceBetView>),
        (status = 404, description = "Race not found")
    ),
    tag = "races"
)]
pub async fn race_bets(State(db): State<Database>, Path(ext_id): Path<String>) -> Result<Response, WebError> {
    let bets = services::race_bets(db.pool(), &ext_id, None, Utc::now()).await?;

    Ok(Json(bets).into_response())
}

#[utoipa::path(
    get,
    path = "/api/races/{ext_id}/bets/{user_id}",
    params(
        ("ext_id" = String, Path, description = "Circuit identifier"),
        ("user_id" = Uuid, Path, description = "Viewer; their own picks and, for admins, every pick are unmasked")
    ),
    responses(
        (status = 200, description = "Every user's bets as the viewer may see them", body = Vec<RaceBetView>),
        (status = 401, description = "Unauthorized - Invalid or missing API key"),
        (status = 404, description = "Race or viewer not found")
    ),
    tag = "races",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn race_bets_for_viewer(
    State(db): State<Database>,
    Path((ext_id, user_id)): Path<(String, Uuid)>,
) -> Result<Response, WebError> {
    let bets = services::race_bets(db.pool(), &ext_id, Some(user_id), Utc::now()).await?;

    Ok(Json(bets).into_response())
}

#[utoipa::path(
    put,
    path = "/api/races/{ext_id}/bets/{user_id}",
    params(
        ("ext_id" = String, Path, description = "Circuit identifier"),
        ("user_id" = Uuid, Path, description = "Bet owner")
    ),
    request_body = SubmitRaceBetsRequest,
    responses(
        (status = 200, description = "Bets stored; locked categories are reported as skipped", body = SubmitRaceBetsResponse),
        (status = 400, description = "Invalid slot, sprint bet on a normal weekend or joker cap reached"),
        (status = 401, description = "Unauthorized - Invalid or missing API key"),
        (status = 404, description = "Race or user not found")
    ),
    tag = "races",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn submit_race_bets(
    State(db): State<Database>,
    Path((ext_id, user_id)): Path<(String, Uuid)>,
    Json(req): Json<SubmitRaceBetsRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let bets = req.to_race_bets()?;

    let accepted = services::submit_race_bets(db.pool(), &ext_id, user_id, bets, Utc::now()).await?;

    Ok(Json(SubmitRaceBetsResponse::from(&accepted)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/races/{ext_id}/score/{user_id}",
    params(
        ("ext_id" = String, Path, description = "Circuit identifier"),
        ("user_id" = Uuid, Path, description = "User to score")
    ),
    responses(
        (status = 200, description = "Live race breakdown against the loaded result", body = RaceScoreResponse),
        (status = 404, description = "Race or user not found")
    ),
    tag = "races"
)]
pub async fn race_score(
    State(db): State<Database>,
    Path((ext_id, user_id)): Path<(String, Uuid)>,
) -> Result<Response, WebError> {
    let score = services::race_score(db.pool(), &ext_id, user_id).await?;

    Ok(Json(score).into_response())
}
