use scoring::{CompetitorKind, StandingsEntry};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};

/// Driver or team taking part in the season.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competitor {
    pub competitor_id: Uuid,
    pub ext_id: String,
    pub code: String,
    pub name: String,
    pub kind: String,
    pub points: f64,
    pub position: i32,
    pub active: bool,
}

impl Competitor {
    pub fn kind(&self) -> Result<CompetitorKind> {
        self.kind
            .parse()
            .map_err(|_| StorageError::InvalidData(format!("competitor kind '{}'", self.kind)))
    }

    /// Standings row for this competitor; unclassified (position 0 or
    /// negative) competitors map to position 0, which tables skip.
    pub fn standings_entry(&self) -> StandingsEntry {
        StandingsEntry::new(
            u32::try_from(self.position).unwrap_or(0),
            self.code.as_str(),
            self.points,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitor(kind: &str, position: i32) -> Competitor {
        Competitor {
            competitor_id: Uuid::new_v4(),
            ext_id: "max_verstappen".to_string(),
            code: "ver".to_string(),
            name: "Max Verstappen".to_string(),
            kind: kind.to_string(),
            points: 25.0,
            position,
            active: true,
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(competitor("DRIVER", 1).kind().unwrap(), CompetitorKind::Driver);
        assert!(competitor("CAR", 1).kind().is_err());
    }

    #[test]
    fn test_standings_entry() {
        let entry = competitor("DRIVER", 3).standings_entry();
        assert_eq!(entry.position, 3);
        assert_eq!(entry.code.as_str(), "VER");

        assert_eq!(competitor("DRIVER", -1).standings_entry().position, 0);
    }
}
