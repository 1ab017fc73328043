use scoring::{Leaderboard, LeaderboardBuilder};
use sqlx::PgPool;

use crate::error::Result;
use crate::repository::bet::{BetRepository, ScoredBet};

/// Ranks users by the points stored by the last evaluation runs.
pub async fn leaderboard(pool: &PgPool) -> Result<Leaderboard> {
    let rows = BetRepository::new(pool).scored_bets().await?;
    Ok(build_leaderboard(&rows))
}

pub fn build_leaderboard(rows: &[ScoredBet]) -> Leaderboard {
    let mut builder = LeaderboardBuilder::new();
    for row in rows {
        match (row.result, row.race_id) {
            (None, _) => builder.add_user(&row.username),
            (Some(points), Some(_)) => builder.add_race_points(&row.username, points),
            (Some(points), None) => builder.add_season_bet(&row.username, points, row.marker()),
        }
    }
    builder.build()
}
