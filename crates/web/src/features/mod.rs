pub mod info;
pub mod leaderboard;
pub mod races;
pub mod results;
pub mod season;
