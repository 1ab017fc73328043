use scoring::{CompetitorKind, RaceCategory, RaceResult, ResultValue};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Race, RaceResultEntry, build_race_result};

pub struct ResultRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResultRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn entries(&self, race_id: Uuid) -> Result<Vec<RaceResultEntry>> {
        let entries = sqlx::query_as::<_, RaceResultEntry>(
            r#"
            SELECT rr.result_id, rr.race_id, rr.category, rr.rank,
                   c.code AS competitor_code, rr.value
            FROM race_results rr
            LEFT JOIN competitors c ON c.competitor_id = rr.competitor_id
            WHERE rr.race_id = $1
            ORDER BY rr.category, rr.rank NULLS FIRST
            "#,
        )
        .bind(race_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Official result of a race; slots not loaded yet are simply absent.
    pub async fn race_result(&self, race: &Race) -> Result<RaceResult> {
        let entries = self.entries(race.race_id).await?;
        Ok(build_race_result(&entries, race.has_sprint()))
    }

    /// Writes result slots, replacing what was loaded before for the same slot.
    ///
    /// Competitor values must name a known driver; the whole load is rolled
    /// back otherwise.
    pub async fn upsert_entries(
        &self,
        race_id: Uuid,
        entries: &[(RaceCategory, Option<u8>, ResultValue)],
    ) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for (category, rank, value) in entries {
            let competitor_id: Option<Uuid> = match &value.competitor {
                Some(code) => {
                    let id = sqlx::query_scalar::<_, Uuid>(
                        r#"
                        SELECT competitor_id
                        FROM competitors
                        WHERE kind = $1 AND UPPER(code) = $2
                        "#,
                    )
                    .bind(CompetitorKind::Driver.as_str())
                    .bind(code.as_str())
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| StorageError::InvalidData(format!("unknown driver code '{code}'")))?;
                    Some(id)
                }
                None => None,
            };

            debug!(%category, ?rank, "writing result slot");
            let result = sqlx::query(
                r#"
                INSERT INTO race_results (race_id, category, rank, competitor_id, value)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (race_id, category, (COALESCE(rank, 0)))
                DO UPDATE SET competitor_id = EXCLUDED.competitor_id, value = EXCLUDED.value
                "#,
            )
            .bind(race_id)
            .bind(category.as_str())
            .bind(rank.map(i32::from))
            .bind(competitor_id)
            .bind(value.text.as_deref())
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;

        Ok(written)
    }
}
