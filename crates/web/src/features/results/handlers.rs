use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::result::{EvaluateRaceRequest, EvaluationResponse, LoadResultRequest, RaceResultResponse},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/races/{ext_id}/result",
    params(
        ("ext_id" = String, Path, description = "Circuit identifier")
    ),
    responses(
        (status = 200, description = "Official result slots loaded so far", body = RaceResultResponse),
        (status = 404, description = "Race not found")
    ),
    tag = "results"
)]
pub async fn get_result(State(db): State<Database>, Path(ext_id): Path<String>) -> Result<Response, WebError> {
    let result = services::get_result(db.pool(), &ext_id).await?;

    Ok(Json(result).into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/races/{ext_id}/result",
    params(
        ("ext_id" = String, Path, description = "Circuit identifier")
    ),
    request_body = LoadResultRequest,
    responses(
        (status = 200, description = "Result slots stored", body = RaceResultResponse),
        (status = 400, description = "Invalid slot or unknown driver code"),
        (status = 401, description = "Unauthorized - Invalid or missing API key"),
        (status = 404, description = "Race not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn load_result(
    State(db): State<Database>,
    Path(ext_id): Path<String>,
    Json(req): Json<LoadResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let entries = req.to_entries()?;

    let result = services::load_result(db.pool(), &ext_id, &entries).await?;

    Ok(Json(result).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/races/{ext_id}/evaluate",
    params(
        ("ext_id" = String, Path, description = "Circuit identifier")
    ),
    request_body = EvaluateRaceRequest,
    responses(
        (status = 200, description = "Race bets scored and points stored", body = EvaluationResponse),
        (status = 401, description = "Unauthorized - Invalid or missing API key"),
        (status = 404, description = "Race not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn evaluate_race(
    State(db): State<Database>,
    Path(ext_id): Path<String>,
    Json(req): Json<EvaluateRaceRequest>,
) -> Result<Response, WebError> {
    let summary = services::evaluate_race(db.pool(), &ext_id, &req.verdicts()).await?;

    Ok(Json(summary).into_response())
}
