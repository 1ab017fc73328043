pub mod bet;
pub mod competitor;
pub mod race;
pub mod race_result;
pub mod user;

pub use bet::{Bet, UserBet, race_bet_set, season_bet_set};
pub use competitor::Competitor;
pub use race::Race;
pub use race_result::{RaceResultEntry, build_race_result};
pub use user::User;
