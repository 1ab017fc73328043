use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{evaluate_race, get_result, load_result};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/admin/races/:ext_id/result", put(load_result))
        .route("/admin/races/:ext_id/evaluate", post(evaluate_race))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/races/:ext_id/result", get(get_result))
        .merge(protected)
}
