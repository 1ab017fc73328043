use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Betting categories attached to a single race weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RaceCategory {
    Race,
    Quali,
    Sprint,
    Sc,
    Fastest,
    Bonus,
    DriverDay,
}

impl RaceCategory {
    pub const ALL: [RaceCategory; 7] = [
        Self::Race,
        Self::Quali,
        Self::Sprint,
        Self::Sc,
        Self::Fastest,
        Self::Bonus,
        Self::DriverDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Race => "RACE",
            Self::Quali => "QUALI",
            Self::Sprint => "SPRINT",
            Self::Sc => "SC",
            Self::Fastest => "FASTEST",
            Self::Bonus => "BONUS",
            Self::DriverDay => "DRIVERDAY",
        }
    }

    /// Highest rank slot for ranked categories. Only the podium is ranked.
    pub fn max_rank(&self) -> Option<u8> {
        match self {
            Self::Race => Some(3),
            _ => None,
        }
    }

    /// Canonical rank for a stored slot, or `None` when the slot is invalid.
    ///
    /// Unranked categories accept both a null rank and rank 1 (older rows were
    /// written with rank 1) and normalize to a null rank.
    pub fn normalize_rank(&self, rank: Option<u8>) -> Option<Option<u8>> {
        match (self.max_rank(), rank) {
            (Some(max), Some(rank)) if (1..=max).contains(&rank) => Some(Some(rank)),
            (None, None) | (None, Some(1)) => Some(None),
            _ => None,
        }
    }

    /// Whether slots of this category name a driver rather than free text.
    pub fn holds_competitor(&self) -> bool {
        !matches!(self, Self::Sc | Self::Bonus)
    }

    /// Human readable slot label used in error messages.
    pub fn slot_label(&self, rank: Option<u8>) -> String {
        match rank {
            Some(rank) => format!("{} {}", self.as_str(), rank),
            None => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for RaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RaceCategory {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RACE" => Ok(Self::Race),
            "QUALI" | "QUALIFYING" => Ok(Self::Quali),
            "SPRINT" => Ok(Self::Sprint),
            "SC" | "SAFETY_CAR" => Ok(Self::Sc),
            "FASTEST" | "FASTEST_LAP" => Ok(Self::Fastest),
            "BONUS" => Ok(Self::Bonus),
            "DRIVERDAY" | "DRIVER_OF_THE_DAY" | "DOD" => Ok(Self::DriverDay),
            other => Err(ScoringError::UnknownCategory(other.to_string())),
        }
    }
}

/// Competitor kind, which doubles as the season bet category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompetitorKind {
    Driver,
    Team,
}

impl CompetitorKind {
    pub const ALL: [CompetitorKind; 2] = [Self::Driver, Self::Team];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "DRIVER",
            Self::Team => "TEAM",
        }
    }

    /// Category string used for season bets in the bet table.
    pub fn season_bet_type(&self) -> &'static str {
        match self {
            Self::Driver => "SEASON_DRIVER",
            Self::Team => "SEASON_TEAM",
        }
    }

    /// Number of ranked slots in a full season prediction.
    pub fn slots(&self) -> u8 {
        match self {
            Self::Driver => 20,
            Self::Team => 10,
        }
    }

    /// Extra points for calling the champion on slot 1.
    pub fn champion_bonus(&self) -> f64 {
        match self {
            Self::Driver => 10.0,
            Self::Team => 5.0,
        }
    }

    pub fn accepts_rank(&self, rank: u8) -> bool {
        (1..=self.slots()).contains(&rank)
    }
}

impl fmt::Display for CompetitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompetitorKind {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRIVER" | "SEASON_DRIVER" | "DRIVERS" => Ok(Self::Driver),
            "TEAM" | "SEASON_TEAM" | "TEAMS" | "CONSTRUCTOR" => Ok(Self::Team),
            other => Err(ScoringError::UnknownCategory(other.to_string())),
        }
    }
}

/// Any bet category, race weekend or season long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Race(RaceCategory),
    Season(CompetitorKind),
}

impl Category {
    /// Parses the category column of the bet table.
    ///
    /// Season bets are stored as `SEASON_DRIVER` / `SEASON_TEAM`; plain
    /// `DRIVER` / `TEAM` are accepted too.
    pub fn from_bet_type(s: &str) -> Result<Self, ScoringError> {
        s.parse::<RaceCategory>()
            .map(Self::Race)
            .or_else(|_| s.parse::<CompetitorKind>().map(Self::Season))
    }

    pub fn bet_type(&self) -> &'static str {
        match self {
            Self::Race(category) => category.as_str(),
            Self::Season(kind) => kind.season_bet_type(),
        }
    }
}

impl From<RaceCategory> for Category {
    fn from(category: RaceCategory) -> Self {
        Self::Race(category)
    }
}

impl From<CompetitorKind> for Category {
    fn from(kind: CompetitorKind) -> Self {
        Self::Season(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_race_category_aliases() {
        assert_eq!("fastest_lap".parse::<RaceCategory>(), Ok(RaceCategory::Fastest));
        assert_eq!("DRIVERDAY".parse::<RaceCategory>(), Ok(RaceCategory::DriverDay));
        assert!("PODIUM".parse::<RaceCategory>().is_err());
    }

    #[test]
    fn test_category_round_trips_through_bet_type() {
        for category in RaceCategory::ALL {
            let parsed = Category::from_bet_type(category.as_str()).unwrap();
            assert_eq!(parsed, Category::Race(category));
        }
        assert_eq!(
            Category::from_bet_type("SEASON_TEAM"),
            Ok(Category::Season(CompetitorKind::Team))
        );
    }

    #[test]
    fn test_normalize_rank() {
        assert_eq!(RaceCategory::Race.normalize_rank(Some(2)), Some(Some(2)));
        assert_eq!(RaceCategory::Race.normalize_rank(Some(4)), None);
        assert_eq!(RaceCategory::Race.normalize_rank(None), None);
        assert_eq!(RaceCategory::Quali.normalize_rank(Some(1)), Some(None));
        assert_eq!(RaceCategory::Quali.normalize_rank(None), Some(None));
        assert_eq!(RaceCategory::Sc.normalize_rank(Some(2)), None);
    }

    #[test]
    fn test_text_categories() {
        assert!(RaceCategory::DriverDay.holds_competitor());
        assert!(!RaceCategory::Sc.holds_competitor());
        assert!(!RaceCategory::Bonus.holds_competitor());
    }

    #[test]
    fn test_season_slots_and_bonus() {
        assert_eq!(CompetitorKind::Driver.slots(), 20);
        assert_eq!(CompetitorKind::Team.slots(), 10);
        assert!(CompetitorKind::Team.accepts_rank(10));
        assert!(!CompetitorKind::Team.accepts_rank(11));
        assert!(!CompetitorKind::Driver.accepts_rank(0));
    }
}
