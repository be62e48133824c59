//! Store doubles for unit tests

use async_trait::async_trait;
use chrono::Duration;

use stat_core::traits::{
    BlacklistRepository, IconRepository, RepoResult, SettingsRepository, StatRepository,
};
use stat_core::{DomainError, GraphType, IconRecord, Settings, Snowflake, StatQuery, StatRecord};

/// Store whose every call fails as if the database were down
pub(crate) struct FailingStore;

fn unavailable<T>() -> RepoResult<T> {
    Err(DomainError::DatabaseError("connection refused".to_string()))
}

#[async_trait]
impl StatRepository for FailingStore {
    async fn add_duration(&self, _: Snowflake, _: &str, _: Duration) -> RepoResult<StatRecord> {
        unavailable()
    }

    async fn find(&self, _: Snowflake, _: &str) -> RepoResult<Option<StatRecord>> {
        unavailable()
    }

    async fn find_by_user(&self, _: Snowflake, _: &StatQuery) -> RepoResult<Vec<StatRecord>> {
        unavailable()
    }

    async fn set_ignored(&self, _: Snowflake, _: &str, _: bool) -> RepoResult<bool> {
        unavailable()
    }

    async fn total_duration(&self, _: Option<Snowflake>) -> RepoResult<Duration> {
        unavailable()
    }

    async fn distinct_games(&self, _: Option<Snowflake>) -> RepoResult<i64> {
        unavailable()
    }

    async fn visibility_counts(&self, _: Snowflake) -> RepoResult<(i64, i64)> {
        unavailable()
    }

    async fn count(&self) -> RepoResult<i64> {
        unavailable()
    }
}

#[async_trait]
impl SettingsRepository for FailingStore {
    async fn insert_if_absent(&self, _: &Settings) -> RepoResult<bool> {
        unavailable()
    }

    async fn find(&self, _: Snowflake) -> RepoResult<Option<Settings>> {
        unavailable()
    }

    async fn set_graph_type(&self, _: Snowflake, _: GraphType) -> RepoResult<()> {
        unavailable()
    }

    async fn set_mention_for_stats(&self, _: Snowflake, _: bool) -> RepoResult<()> {
        unavailable()
    }
}

#[async_trait]
impl IconRepository for FailingStore {
    async fn find(&self, _: &str) -> RepoResult<Option<IconRecord>> {
        unavailable()
    }

    async fn upsert(&self, _: &IconRecord) -> RepoResult<()> {
        unavailable()
    }

    async fn count(&self) -> RepoResult<i64> {
        unavailable()
    }
}

#[async_trait]
impl BlacklistRepository for FailingStore {
    async fn contains(&self, _: &str) -> RepoResult<bool> {
        unavailable()
    }

    async fn insert(&self, _: &str) -> RepoResult<bool> {
        unavailable()
    }
}
