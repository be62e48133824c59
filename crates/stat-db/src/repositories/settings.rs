//! PostgreSQL implementation of SettingsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use stat_core::entities::{GraphType, Settings};
use stat_core::traits::{RepoResult, SettingsRepository};
use stat_core::value_objects::Snowflake;

use crate::models::SettingsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SettingsRepository
#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    /// Create a new PgSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    #[instrument(skip(self))]
    async fn insert_if_absent(&self, settings: &Settings) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, graph_type, mention_for_stats)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(settings.user_id.into_inner())
        .bind(settings.graph_type.as_str())
        .bind(settings.mention_for_stats)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn find(&self, user_id: Snowflake) -> RepoResult<Option<Settings>> {
        let result = sqlx::query_as::<_, SettingsModel>(
            r#"
            SELECT user_id, graph_type, mention_for_stats
            FROM user_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Settings::from))
    }

    #[instrument(skip(self))]
    async fn set_graph_type(&self, user_id: Snowflake, graph_type: GraphType) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, graph_type, mention_for_stats)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (user_id) DO UPDATE SET graph_type = EXCLUDED.graph_type
            "#,
        )
        .bind(user_id.into_inner())
        .bind(graph_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_mention_for_stats(&self, user_id: Snowflake, enabled: bool) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, graph_type, mention_for_stats)
            VALUES ($1, 'bar', $2)
            ON CONFLICT (user_id) DO UPDATE SET mention_for_stats = EXCLUDED.mention_for_stats
            "#,
        )
        .bind(user_id.into_inner())
        .bind(enabled)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
