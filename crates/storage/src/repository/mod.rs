pub mod bet;
pub mod competitor;
pub mod race;
pub mod result;
pub mod user;
