use scoring::{AcceptedRaceBets, BetMarker, CompetitorKind, RaceCategory, ScoringError, SeasonBet};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Bet, UserBet};

const BET_COLUMNS: &str = "b.bet_id, b.user_id, b.race_id, b.category, b.rank, b.value, \
                           b.result, b.extra, b.is_correct, b.updated_at";

/// Stored points of one bet, joined with its owner for the leaderboard.
#[derive(Debug, Clone, FromRow)]
pub struct ScoredBet {
    pub username: String,
    pub race_id: Option<Uuid>,
    pub result: Option<f64>,
    pub extra: Option<String>,
}

impl ScoredBet {
    pub fn marker(&self) -> Option<BetMarker> {
        self.extra.as_deref().and_then(|extra| extra.parse().ok())
    }
}

pub struct BetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BetRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn race_bets_for_user(&self, user_id: Uuid, race_id: Uuid) -> Result<Vec<Bet>> {
        let bets = sqlx::query_as::<_, Bet>(&format!(
            r#"
            SELECT {BET_COLUMNS}
            FROM bets b
            WHERE b.user_id = $1 AND b.race_id = $2
            ORDER BY b.category, b.rank NULLS FIRST
            "#
        ))
        .bind(user_id)
        .bind(race_id)
        .fetch_all(self.pool)
        .await?;

        Ok(bets)
    }

    /// Every user's bets for one race.
    pub async fn race_bets(&self, race_id: Uuid) -> Result<Vec<UserBet>> {
        let bets = sqlx::query_as::<_, UserBet>(&format!(
            r#"
            SELECT u.username, {BET_COLUMNS}
            FROM bets b
            INNER JOIN users u ON u.user_id = b.user_id
            WHERE b.race_id = $1
            ORDER BY u.username, b.category, b.rank NULLS FIRST
            "#
        ))
        .bind(race_id)
        .fetch_all(self.pool)
        .await?;

        Ok(bets)
    }

    pub async fn season_bets_for_user(&self, user_id: Uuid) -> Result<Vec<Bet>> {
        let bets = sqlx::query_as::<_, Bet>(&format!(
            r#"
            SELECT {BET_COLUMNS}
            FROM bets b
            WHERE b.user_id = $1 AND b.race_id IS NULL AND b.category = ANY($2)
            ORDER BY b.category, b.rank
            "#
        ))
        .bind(user_id)
        .bind(season_bet_types())
        .fetch_all(self.pool)
        .await?;

        Ok(bets)
    }

    /// Every user's season bets.
    pub async fn season_bets(&self) -> Result<Vec<UserBet>> {
        let bets = sqlx::query_as::<_, UserBet>(&format!(
            r#"
            SELECT u.username, {BET_COLUMNS}
            FROM bets b
            INNER JOIN users u ON u.user_id = b.user_id
            WHERE b.race_id IS NULL AND b.category = ANY($1)
            ORDER BY u.username, b.category, b.rank
            "#
        ))
        .bind(season_bet_types())
        .fetch_all(self.pool)
        .await?;

        Ok(bets)
    }

    /// Validates and writes one user's race slots in a single transaction.
    ///
    /// The user row is locked first, so submissions of the same user run one
    /// at a time and `validate` always sees the jokers committed by the others.
    /// `validate` gets the number of jokers on races other than `race_id`.
    pub async fn store_race_bets<F>(
        &self,
        user_id: Uuid,
        race_id: Uuid,
        validate: F,
    ) -> Result<(AcceptedRaceBets, u64)>
    where
        F: FnOnce(usize) -> std::result::Result<AcceptedRaceBets, ScoringError>,
    {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id
            FROM users
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let jokers_used = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM bets
            WHERE user_id = $1
              AND race_id IS NOT NULL
              AND race_id <> $2
              AND category = $3
              AND rank = 1
              AND extra = $4
            "#,
        )
        .bind(user_id)
        .bind(race_id)
        .bind(RaceCategory::Race.as_str())
        .bind(BetMarker::Joker.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let accepted = validate(usize::try_from(jokers_used).unwrap_or(usize::MAX))?;

        let mut written = 0;
        for bet in &accepted.bets {
            let result = sqlx::query(
                r#"
                INSERT INTO bets (user_id, race_id, category, rank, value, extra)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (
                    user_id,
                    (COALESCE(race_id, '00000000-0000-0000-0000-000000000000'::uuid)),
                    category,
                    (COALESCE(rank, 0))
                )
                DO UPDATE SET value = EXCLUDED.value,
                              extra = EXCLUDED.extra,
                              updated_at = CURRENT_TIMESTAMP
                "#,
            )
            .bind(user_id)
            .bind(race_id)
            .bind(bet.category.as_str())
            .bind(bet.rank.map(i32::from))
            .bind(bet.value())
            .bind(bet.marker.map(|marker| marker.as_str()))
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;

        Ok((accepted, written))
    }

    /// Replaces the user's season order for every kind present in `bets`.
    ///
    /// Kinds not submitted keep their stored order.
    pub async fn replace_season_bets(&self, user_id: Uuid, bets: &[SeasonBet]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        for kind in CompetitorKind::ALL {
            if !bets.iter().any(|bet| bet.kind == kind) {
                continue;
            }
            sqlx::query(
                r#"
                DELETE FROM bets
                WHERE user_id = $1 AND race_id IS NULL AND category = $2
                "#,
            )
            .bind(user_id)
            .bind(kind.season_bet_type())
            .execute(&mut *tx)
            .await?;
        }

        let mut written = 0;
        for bet in bets {
            let result = sqlx::query(
                r#"
                INSERT INTO bets (user_id, race_id, category, rank, value)
                VALUES ($1, NULL, $2, $3, $4)
                "#,
            )
            .bind(user_id)
            .bind(bet.kind.season_bet_type())
            .bind(i32::from(bet.rank))
            .bind(bet.code.as_str())
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;

        Ok(written)
    }

    /// Records the admin verdict on each user's bonus answer for a race.
    pub async fn set_bonus_verdicts(&self, race_id: Uuid, verdicts: &[(Uuid, bool)]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for (user_id, correct) in verdicts {
            let result = sqlx::query(
                r#"
                UPDATE bets
                SET is_correct = $3
                WHERE race_id = $1 AND user_id = $2 AND category = $4
                "#,
            )
            .bind(race_id)
            .bind(user_id)
            .bind(correct)
            .bind(RaceCategory::Bonus.as_str())
            .execute(&mut *tx)
            .await?;

            updated += result.rows_affected();
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Overwrites the points of every bet of a race. Bets missing from
    /// `points` are reset to 0.
    pub async fn store_race_points(&self, race_id: Uuid, points: &[(Uuid, f64)]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE bets
            SET result = 0
            WHERE race_id = $1
            "#,
        )
        .bind(race_id)
        .execute(&mut *tx)
        .await?;

        let mut written = 0;
        for (bet_id, result) in points {
            let row = sqlx::query(
                r#"
                UPDATE bets
                SET result = $2
                WHERE bet_id = $1 AND race_id = $3
                "#,
            )
            .bind(bet_id)
            .bind(result)
            .bind(race_id)
            .execute(&mut *tx)
            .await?;

            written += row.rows_affected();
        }

        tx.commit().await?;

        Ok(written)
    }

    /// Overwrites the points and duel markers of every season bet. Bets
    /// missing from `points` are reset to 0 with no marker.
    pub async fn store_season_points(&self, points: &[(Uuid, f64, Option<BetMarker>)]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE bets
            SET result = 0, extra = NULL
            WHERE race_id IS NULL AND category = ANY($1)
            "#,
        )
        .bind(season_bet_types())
        .execute(&mut *tx)
        .await?;

        let mut written = 0;
        for (bet_id, result, marker) in points {
            let row = sqlx::query(
                r#"
                UPDATE bets
                SET result = $2, extra = $3
                WHERE bet_id = $1 AND race_id IS NULL
                "#,
            )
            .bind(bet_id)
            .bind(result)
            .bind(marker.map(|marker| marker.as_str()))
            .execute(&mut *tx)
            .await?;

            written += row.rows_affected();
        }

        tx.commit().await?;

        Ok(written)
    }

    /// Stored points of every bet, plus one empty row per user without bets.
    pub async fn scored_bets(&self) -> Result<Vec<ScoredBet>> {
        let rows = sqlx::query_as::<_, ScoredBet>(
            r#"
            SELECT u.username, b.race_id, b.result, b.extra
            FROM users u
            LEFT JOIN bets b ON b.user_id = u.user_id
            ORDER BY u.username
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

fn season_bet_types() -> Vec<&'static str> {
    CompetitorKind::ALL.iter().map(|kind| kind.season_bet_type()).collect()
}
