//! PostgreSQL implementation of StatRepository

use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;
use tracing::instrument;

use stat_core::entities::{StatQuery, StatRecord, StatSort};
use stat_core::traits::{RepoResult, StatRepository};
use stat_core::value_objects::Snowflake;

use crate::models::{StatModel, VisibilityCountModel};

use super::error::map_db_error;

/// PostgreSQL implementation of StatRepository
#[derive(Clone)]
pub struct PgStatRepository {
    pool: PgPool,
}

impl PgStatRepository {
    /// Create a new PgStatRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// ORDER BY clause for a sort; fixed strings only, never user input
fn order_clause(sort: StatSort) -> &'static str {
    match sort {
        StatSort::Unsorted => "",
        StatSort::DurationDesc => "ORDER BY duration_ms DESC, game ASC",
        StatSort::GameAsc => "ORDER BY game ASC",
    }
}

#[async_trait]
impl StatRepository for PgStatRepository {
    #[instrument(skip(self))]
    async fn add_duration(
        &self,
        user_id: Snowflake,
        game: &str,
        elapsed: Duration,
    ) -> RepoResult<StatRecord> {
        let model = sqlx::query_as::<_, StatModel>(
            r#"
            INSERT INTO game_stats (user_id, game, duration_ms, ignored, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, NOW(), NOW())
            ON CONFLICT (user_id, game) DO UPDATE
                SET duration_ms = game_stats.duration_ms + EXCLUDED.duration_ms,
                    updated_at = NOW()
            RETURNING user_id, game, duration_ms, ignored, created_at, updated_at
            "#,
        )
        .bind(user_id.into_inner())
        .bind(game)
        .bind(elapsed.num_milliseconds().max(0))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(StatRecord::from(model))
    }

    #[instrument(skip(self))]
    async fn find(&self, user_id: Snowflake, game: &str) -> RepoResult<Option<StatRecord>> {
        let result = sqlx::query_as::<_, StatModel>(
            r#"
            SELECT user_id, game, duration_ms, ignored, created_at, updated_at
            FROM game_stats
            WHERE user_id = $1 AND game = $2
            "#,
        )
        .bind(user_id.into_inner())
        .bind(game)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(StatRecord::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(
        &self,
        user_id: Snowflake,
        query: &StatQuery,
    ) -> RepoResult<Vec<StatRecord>> {
        let sql = format!(
            r#"
            SELECT user_id, game, duration_ms, ignored, created_at, updated_at
            FROM game_stats
            WHERE user_id = $1 AND ($2 OR NOT ignored)
            {}
            LIMIT $3
            "#,
            order_clause(query.sort)
        );

        let results = sqlx::query_as::<_, StatModel>(&sql)
            .bind(user_id.into_inner())
            .bind(query.include_ignored)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(StatRecord::from).collect())
    }

    #[instrument(skip(self))]
    async fn set_ignored(&self, user_id: Snowflake, game: &str, ignored: bool) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE game_stats SET ignored = $3, updated_at = NOW()
            WHERE user_id = $1 AND game = $2
            "#,
        )
        .bind(user_id.into_inner())
        .bind(game)
        .bind(ignored)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn total_duration(&self, user_id: Option<Snowflake>) -> RepoResult<Duration> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(duration_ms), 0)::BIGINT
            FROM game_stats
            WHERE NOT ignored AND ($1::BIGINT IS NULL OR user_id = $1)
            "#,
        )
        .bind(user_id.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Duration::milliseconds(total))
    }

    #[instrument(skip(self))]
    async fn distinct_games(&self, user_id: Option<Snowflake>) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT game)
            FROM game_stats
            WHERE NOT ignored AND ($1::BIGINT IS NULL OR user_id = $1)
            "#,
        )
        .bind(user_id.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn visibility_counts(&self, user_id: Snowflake) -> RepoResult<(i64, i64)> {
        let counts = sqlx::query_as::<_, VisibilityCountModel>(
            r#"
            SELECT COUNT(*) FILTER (WHERE NOT ignored) AS visible,
                   COUNT(*) FILTER (WHERE ignored) AS ignored
            FROM game_stats
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok((counts.visible, counts.ignored))
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM game_stats")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
