use scoring::{Leaderboard, LeaderboardRow};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardRowResponse {
    pub rank: u32,
    pub user: String,
    pub points: f64,
}

impl From<LeaderboardRow> for LeaderboardRowResponse {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            rank: row.rank,
            user: row.user,
            points: row.points,
        }
    }
}

/// RACES, SEASON and TOTAL tables, best first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub races: Vec<LeaderboardRowResponse>,
    pub season: Vec<LeaderboardRowResponse>,
    pub total: Vec<LeaderboardRowResponse>,
}

impl From<Leaderboard> for LeaderboardResponse {
    fn from(board: Leaderboard) -> Self {
        let rows = |rows: Vec<LeaderboardRow>| -> Vec<LeaderboardRowResponse> {
            rows.into_iter().map(LeaderboardRowResponse::from).collect()
        };
        Self {
            races: rows(board.races),
            season: rows(board.season),
            total: rows(board.total),
        }
    }
}
