use axum::Router;

use crate::features::{info, leaderboard, races, results, season};
use crate::middleware::auth::ApiKeys;
use crate::state::AppState;

/// Every API route, mounted under `/api`.
pub fn api_router(api_keys: ApiKeys) -> Router<AppState> {
    let api = Router::new()
        .merge(races::routes::routes(api_keys.clone()))
        .merge(results::routes::routes(api_keys.clone()))
        .merge(season::routes::routes(api_keys))
        .merge(leaderboard::routes::routes())
        .merge(info::routes::routes());

    Router::new().nest("/api", api)
}
