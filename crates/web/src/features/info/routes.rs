use axum::{Router, routing::get};

use super::handlers::get_info;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/info", get(get_info))
}
