use axum::{
    Router, middleware,
    routing::get,
};

use super::handlers::{
    current_race, get_race, list_races, race_bets, race_bets_for_viewer, race_locks, race_score, submit_race_bets,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/races/:ext_id/bets/:user_id",
            get(race_bets_for_viewer).put(submit_race_bets),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/races", get(list_races))
        .route("/races/current", get(current_race))
        .route("/races/:ext_id", get(get_race))
        .route("/races/:ext_id/locks", get(race_locks))
        .route("/races/:ext_id/bets", get(race_bets))
        .route("/races/:ext_id/score/:user_id", get(race_score))
        .merge(protected)
}
