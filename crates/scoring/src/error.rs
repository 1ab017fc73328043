use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Unknown bet category: {0}")]
    UnknownCategory(String),

    #[error("Unknown bet marker: {0}")]
    UnknownMarker(String),

    #[error("Rank {rank} is not valid for {category}")]
    RankOutOfRange { category: String, rank: u8 },

    #[error("Category {0} does not take a rank")]
    UnexpectedRank(String),

    #[error("More than one bet for {0}")]
    DuplicateBet(String),

    #[error("Competitor {0} is picked more than once")]
    DuplicateCompetitor(String),

    #[error("Marker {marker} is not allowed on {slot}")]
    MarkerNotAllowed { marker: String, slot: String },

    #[error("All {max} jokers of the season are already used")]
    JokerCapExceeded { max: usize },

    #[error("This race has no sprint session")]
    NoSprint,

    #[error("Season bets are locked")]
    SeasonLocked,

    #[error("Invalid duel roster entry: {0}")]
    InvalidRoster(String),
}
