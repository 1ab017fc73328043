pub mod evaluation;
pub mod leaderboard;
pub mod live;
pub mod standings;
pub mod submission;
