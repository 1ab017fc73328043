use std::sync::Arc;

use axum::{Json, extract::State};
use scoring::MAX_JOKERS;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::GameSettings;

#[derive(Debug, Serialize, ToSchema)]
pub struct DuelPairResponse {
    pub team: String,
    pub first: String,
    pub second: String,
}

/// Game rules in force for this season.
#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub season_locked: bool,
    pub registration_locked: bool,
    pub max_jokers: usize,
    pub duel_roster: Vec<DuelPairResponse>,
    pub standings_exclude: Vec<String>,
}

impl From<&GameSettings> for InfoResponse {
    fn from(game: &GameSettings) -> Self {
        Self {
            season_locked: game.season_lock.is_locked(),
            registration_locked: game.registration_lock,
            max_jokers: MAX_JOKERS,
            duel_roster: game
                .duel_roster
                .iter()
                .map(|(team, pair)| DuelPairResponse {
                    team: team.to_string(),
                    first: pair.first.to_string(),
                    second: pair.second.to_string(),
                })
                .collect(),
            standings_exclude: game.standings_exclude.iter().map(ToString::to_string).collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/info",
    responses(
        (status = 200, description = "Lock flags, joker cap and duel roster", body = InfoResponse)
    ),
    tag = "info"
)]
pub async fn get_info(State(game): State<Arc<GameSettings>>) -> Json<InfoResponse> {
    Json(InfoResponse::from(game.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring::{CompetitorCode, DuelRoster, SeasonLock};

    #[test]
    fn test_info_from_settings() {
        let game = GameSettings {
            season_lock: SeasonLock::new(true),
            registration_lock: false,
            duel_roster: DuelRoster::new().with_pair("FER", "LEC", "HAM"),
            standings_exclude: vec![CompetitorCode::new("COL")],
        };

        let info = InfoResponse::from(&game);
        assert!(info.season_locked);
        assert!(!info.registration_locked);
        assert_eq!(info.max_jokers, 3);
        assert_eq!(info.duel_roster[0].team, "FER");
        assert_eq!(info.duel_roster[0].second, "HAM");
        assert_eq!(info.standings_exclude, vec!["COL".to_string()]);
    }
}
