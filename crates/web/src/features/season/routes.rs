use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    evaluate_season, get_standings, season_bets, season_bets_for_viewer, season_score, submit_season_bets,
    update_standings,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/season/bets/:user_id",
            get(season_bets_for_viewer).put(submit_season_bets),
        )
        .route("/admin/season/standings", put(update_standings))
        .route("/admin/season/evaluate", post(evaluate_season))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/season/standings/:kind", get(get_standings))
        .route("/season/bets", get(season_bets))
        .route("/season/score/:user_id", get(season_score))
        .merge(protected)
}
