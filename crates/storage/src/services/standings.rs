use scoring::{CompetitorCode, CompetitorKind, StandingsEntry, StandingsTable};
use sqlx::PgPool;
use tracing::info;

use crate::error::Result;
use crate::models::Competitor;
use crate::repository::competitor::CompetitorRepository;

/// Builds the standings table used for scoring.
///
/// Driver standings drop `excluded` codes and are re-ranked densely; team
/// standings are used as stored.
pub fn standings_table(kind: CompetitorKind, competitors: &[Competitor], excluded: &[CompetitorCode]) -> StandingsTable {
    let entries = competitors.iter().map(Competitor::standings_entry);
    match kind {
        CompetitorKind::Driver => StandingsTable::adjusted(entries, excluded),
        CompetitorKind::Team => StandingsTable::new(entries),
    }
}

/// Loads current standings of one kind, returning the table alongside the
/// classified competitors it was built from.
pub async fn load_standings(
    pool: &PgPool,
    kind: CompetitorKind,
    excluded: &[CompetitorCode],
) -> Result<(StandingsTable, Vec<Competitor>)> {
    let competitors = CompetitorRepository::new(pool).standings(kind).await?;
    let table = standings_table(kind, &competitors, excluded);

    Ok((table, competitors))
}

pub async fn update_standings(pool: &PgPool, kind: CompetitorKind, entries: &[StandingsEntry]) -> Result<u64> {
    let updated = CompetitorRepository::new(pool)
        .update_standings(kind, entries)
        .await?;

    info!(%kind, updated, "standings snapshot stored");

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn competitor(kind: &str, code: &str, position: i32) -> Competitor {
        Competitor {
            competitor_id: Uuid::new_v4(),
            ext_id: code.to_lowercase(),
            code: code.to_string(),
            name: code.to_string(),
            kind: kind.to_string(),
            points: 0.0,
            position,
            active: true,
        }
    }

    #[test]
    fn test_excluded_drivers_are_reranked() {
        let drivers = vec![
            competitor("DRIVER", "PIA", 1),
            competitor("DRIVER", "COL", 2),
            competitor("DRIVER", "NOR", 3),
        ];
        let table = standings_table(CompetitorKind::Driver, &drivers, &[CompetitorCode::new("COL")]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.holder_at(2), Some(&CompetitorCode::new("NOR")));
    }

    #[test]
    fn test_team_standings_kept_as_stored() {
        let teams = vec![competitor("TEAM", "MCL", 1), competitor("TEAM", "FER", 3)];
        let table = standings_table(CompetitorKind::Team, &teams, &[CompetitorCode::new("MCL")]);

        assert_eq!(table.holder_at(1), Some(&CompetitorCode::new("MCL")));
        assert_eq!(table.holder_at(2), None);
        assert_eq!(table.position_of(&CompetitorCode::new("FER")), Some(3));
    }
}
