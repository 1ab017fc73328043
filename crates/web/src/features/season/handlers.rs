use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use scoring::CompetitorKind;
use storage::{
    Database,
    dto::{
        result::EvaluationResponse,
        score::SeasonScoreResponse,
        season::{
            SeasonBetView, StandingsResponse, SubmitSeasonBetsRequest, SubmitSeasonBetsResponse,
            UpdateStandingsRequest,
        },
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::GameSettings;

use super::services;

#[utoipa::path(
    get,
    path = "/api/season/standings/{kind}",
    params(
        ("kind" = String, Path, description = "DRIVER or TEAM")
    ),
    responses(
        (status = 200, description = "Standings used for season scoring", body = StandingsResponse),
        (status = 400, description = "Unknown competitor kind")
    ),
    tag = "season"
)]
pub async fn get_standings(
    State(db): State<Database>,
    State(game): State<Arc<GameSettings>>,
    Path(kind): Path<String>,
) -> Result<Response, WebError> {
    let kind: CompetitorKind = kind.parse()?;

    let standings = services::get_standings(db.pool(), kind, &game.standings_exclude).await?;

    Ok(Json(standings).into_response())
}

#[utoipa::path(
    get,
    path = "/api/season/score/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User to score")
    ),
    responses(
        (status = 200, description = "Live season breakdown; only the total until the season locks", body = SeasonScoreResponse),
        (status = 404, description = "User not found")
    ),
    tag = "season"
)]
pub async fn season_score(
    State(db): State<Database>,
    State(game): State<Arc<GameSettings>>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let score = services::season_score(
        db.pool(),
        user_id,
        &game.duel_roster,
        &game.standings_exclude,
        game.season_lock,
        Utc::now(),
    )
    .await?;

    Ok(Json(score).into_response())
}

#[utoipa::path(
    get,
    path = "/api/season/bets",
    responses(
        (status = 200, description = "Every user's season order, masked until the season locks", body = Vec<SeasonBetView>)
    ),
    tag = "season"
)]
pub async fn season_bets(
    State(db): State<Database>,
    State(game): State<Arc<GameSettings>>,
) -> Result<Response, WebError> {
    let bets = services::season_bets(db.pool(), None, game.season_lock, Utc::now()).await?;

    Ok(Json(bets).into_response())
}

#[utoipa::path(
    get,
    path = "/api/season/bets/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Viewer; their own order and, for admins, every order are unmasked")
    ),
    responses(
        (status = 200, description = "Every user's season order as the viewer may see it", body = Vec<SeasonBetView>),
        (status = 401, description = "Unauthorized - Invalid or missing API key"),
        (status = 404, description = "Viewer not found")
    ),
    tag = "season",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn season_bets_for_viewer(
    State(db): State<Database>,
    State(game): State<Arc<GameSettings>>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let bets = services::season_bets(db.pool(), Some(user_id), game.season_lock, Utc::now()).await?;

    Ok(Json(bets).into_response())
}

#[utoipa::path(
    put,
    path = "/api/season/bets/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Bet owner")
    ),
    request_body = SubmitSeasonBetsRequest,
    responses(
        (status = 200, description = "Season order stored", body = SubmitSeasonBetsResponse),
        (status = 400, description = "Season locked, invalid rank or duplicate pick"),
        (status = 401, description = "Unauthorized - Invalid or missing API key"),
        (status = 404, description = "User not found")
    ),
    tag = "season",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn submit_season_bets(
    State(db): State<Database>,
    State(game): State<Arc<GameSettings>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SubmitSeasonBetsRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let bets = req.to_season_bets()?;

    let stored = services::submit_season_bets(db.pool(), user_id, game.season_lock, bets).await?;

    Ok(Json(SubmitSeasonBetsResponse {
        accepted: stored.len(),
    })
    .into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/season/standings",
    request_body = UpdateStandingsRequest,
    responses(
        (status = 200, description = "Standings snapshot stored", body = StandingsResponse),
        (status = 400, description = "Unknown kind, duplicate entry or unknown code"),
        (status = 401, description = "Unauthorized - Invalid or missing API key")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_standings(
    State(db): State<Database>,
    Json(req): Json<UpdateStandingsRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let kind = req.competitor_kind()?;
    let entries = req.standings_entries()?;

    let standings = services::update_standings(db.pool(), kind, &entries).await?;

    Ok(Json(standings).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/season/evaluate",
    responses(
        (status = 200, description = "Season bets scored and points stored", body = EvaluationResponse),
        (status = 401, description = "Unauthorized - Invalid or missing API key")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn evaluate_season(
    State(db): State<Database>,
    State(game): State<Arc<GameSettings>>,
) -> Result<Response, WebError> {
    let summary =
        services::evaluate_season(db.pool(), &game.duel_roster, &game.standings_exclude).await?;

    Ok(Json(summary).into_response())
}
