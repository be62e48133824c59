//! PostgreSQL implementations of IconRepository and BlacklistRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use stat_core::entities::IconRecord;
use stat_core::traits::{BlacklistRepository, IconRepository, RepoResult};

use crate::models::IconModel;

use super::error::map_db_error;

/// PostgreSQL implementation of IconRepository
#[derive(Clone)]
pub struct PgIconRepository {
    pool: PgPool,
}

impl PgIconRepository {
    /// Create a new PgIconRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IconRepository for PgIconRepository {
    #[instrument(skip(self))]
    async fn find(&self, game: &str) -> RepoResult<Option<IconRecord>> {
        let result = sqlx::query_as::<_, IconModel>(
            "SELECT game, location, color FROM game_icons WHERE game = $1",
        )
        .bind(game)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(IconRecord::from))
    }

    #[instrument(skip(self))]
    async fn upsert(&self, icon: &IconRecord) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO game_icons (game, location, color)
            VALUES ($1, $2, $3)
            ON CONFLICT (game) DO UPDATE
                SET location = EXCLUDED.location, color = EXCLUDED.color
            "#,
        )
        .bind(&icon.game)
        .bind(&icon.location)
        .bind(icon.color.as_deref())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM game_icons")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}

/// PostgreSQL implementation of BlacklistRepository
#[derive(Clone)]
pub struct PgBlacklistRepository {
    pool: PgPool,
}

impl PgBlacklistRepository {
    /// Create a new PgBlacklistRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlacklistRepository for PgBlacklistRepository {
    #[instrument(skip(self))]
    async fn contains(&self, game: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM icon_blacklist WHERE game = $1)",
        )
        .bind(game)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn insert(&self, game: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            "INSERT INTO icon_blacklist (game) VALUES ($1) ON CONFLICT (game) DO NOTHING",
        )
        .bind(game)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }
}
