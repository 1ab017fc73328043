use chrono::{DateTime, TimeDelta, Utc};
use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::Race;

/// A race stays "current" for this long after its start.
pub const CURRENT_RACE_GRACE_HOURS: i64 = 6;

pub struct RaceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RaceRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Race>> {
        let races = sqlx::query_as::<_, Race>(
            r#"
            SELECT race_id, ext_id, round, name, country, circuit_name,
                   quali_date, sprint_date, race_date, kind, bonus_question
            FROM races
            ORDER BY round
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(races)
    }

    pub async fn find_by_ext_id(&self, ext_id: &str) -> Result<Race> {
        let race = sqlx::query_as::<_, Race>(
            r#"
            SELECT race_id, ext_id, round, name, country, circuit_name,
                   quali_date, sprint_date, race_date, kind, bonus_question
            FROM races
            WHERE ext_id = $1
            "#,
        )
        .bind(ext_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(race)
    }

    /// The next race to bet on: the earliest one starting no more than
    /// [`CURRENT_RACE_GRACE_HOURS`] ago, or the last round once the season is over.
    pub async fn current(&self, now: DateTime<Utc>) -> Result<Race> {
        let cutoff = now - TimeDelta::hours(CURRENT_RACE_GRACE_HOURS);

        let upcoming = sqlx::query_as::<_, Race>(
            r#"
            SELECT race_id, ext_id, round, name, country, circuit_name,
                   quali_date, sprint_date, race_date, kind, bonus_question
            FROM races
            WHERE race_date >= $1
            ORDER BY race_date, round
            LIMIT 1
            "#,
        )
        .bind(cutoff)
        .fetch_optional(self.pool)
        .await?;

        if let Some(race) = upcoming {
            return Ok(race);
        }

        let last = sqlx::query_as::<_, Race>(
            r#"
            SELECT race_id, ext_id, round, name, country, circuit_name,
                   quali_date, sprint_date, race_date, kind, bonus_question
            FROM races
            ORDER BY round DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(last)
    }
}
