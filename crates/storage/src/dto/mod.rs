pub mod leaderboard;
pub mod race;
pub mod result;
pub mod score;
pub mod season;
