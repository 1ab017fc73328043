use std::sync::Arc;

use axum::extract::FromRef;
use scoring::{CompetitorCode, DuelRoster, SeasonLock};
use storage::Database;

use crate::config::Config;

/// Game rules fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub season_lock: SeasonLock,
    pub registration_lock: bool,
    pub duel_roster: DuelRoster,
    pub standings_exclude: Vec<CompetitorCode>,
}

impl From<&Config> for GameSettings {
    fn from(config: &Config) -> Self {
        Self {
            season_lock: SeasonLock::new(config.season_lock),
            registration_lock: config.registration_lock,
            duel_roster: config.duel_roster.clone(),
            standings_exclude: config.standings_exclude.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub game: Arc<GameSettings>,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<GameSettings> {
    fn from_ref(state: &AppState) -> Self {
        state.game.clone()
    }
}
