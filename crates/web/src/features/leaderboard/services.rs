use scoring::Leaderboard;
use sqlx::PgPool;
use storage::{error::Result, services::leaderboard};

pub async fn get_leaderboard(pool: &PgPool) -> Result<Leaderboard> {
    leaderboard::leaderboard(pool).await
}
