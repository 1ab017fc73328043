use scoring::{CompetitorKind, StandingsEntry};
use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::Competitor;

pub struct CompetitorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitorRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_kind(&self, kind: CompetitorKind) -> Result<Vec<Competitor>> {
        let competitors = sqlx::query_as::<_, Competitor>(
            r#"
            SELECT competitor_id, ext_id, code, name, kind, points, position, active
            FROM competitors
            WHERE kind = $1
            ORDER BY code
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(competitors)
    }

    /// Classified competitors of one kind, in standings order.
    pub async fn standings(&self, kind: CompetitorKind) -> Result<Vec<Competitor>> {
        let competitors = sqlx::query_as::<_, Competitor>(
            r#"
            SELECT competitor_id, ext_id, code, name, kind, points, position, active
            FROM competitors
            WHERE kind = $1 AND position > 0
            ORDER BY position
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(competitors)
    }

    /// Replaces the standings snapshot of one kind.
    ///
    /// Competitors missing from `entries` become unclassified (position 0).
    /// Unknown codes abort the whole snapshot.
    pub async fn update_standings(&self, kind: CompetitorKind, entries: &[StandingsEntry]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE competitors
            SET position = 0
            WHERE kind = $1
            "#,
        )
        .bind(kind.as_str())
        .execute(&mut *tx)
        .await?;

        let mut updated = 0;
        for entry in entries {
            let result = sqlx::query(
                r#"
                UPDATE competitors
                SET position = $3, points = $4
                WHERE kind = $1 AND UPPER(code) = $2
                "#,
            )
            .bind(kind.as_str())
            .bind(entry.code.as_str())
            .bind(i32::try_from(entry.position).unwrap_or(i32::MAX))
            .bind(entry.points)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StorageError::InvalidData(format!(
                    "unknown {} code '{}'",
                    kind.as_str().to_lowercase(),
                    entry.code
                )));
            }
            updated += result.rows_affected();
        }

        tx.commit().await?;

        Ok(updated)
    }
}
