//! Repository traits (ports) - the persistent store as seen by the engine
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or in-process).

use async_trait::async_trait;
use chrono::Duration;

use crate::entities::{GraphType, IconRecord, Settings, StatQuery, StatRecord};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Stat Repository
// ============================================================================

#[async_trait]
pub trait StatRepository: Send + Sync {
    /// Add `elapsed` to the `(user_id, game)` total, creating a visible row if absent
    async fn add_duration(
        &self,
        user_id: Snowflake,
        game: &str,
        elapsed: Duration,
    ) -> RepoResult<StatRecord>;

    /// Find a single record
    async fn find(&self, user_id: Snowflake, game: &str) -> RepoResult<Option<StatRecord>>;

    /// List a user's records
    async fn find_by_user(&self, user_id: Snowflake, query: &StatQuery)
        -> RepoResult<Vec<StatRecord>>;

    /// Toggle visibility; returns false if the record does not exist
    async fn set_ignored(&self, user_id: Snowflake, game: &str, ignored: bool) -> RepoResult<bool>;

    /// Sum of visible durations, for one user or for everyone
    async fn total_duration(&self, user_id: Option<Snowflake>) -> RepoResult<Duration>;

    /// Number of distinct visible games, for one user or for everyone
    async fn distinct_games(&self, user_id: Option<Snowflake>) -> RepoResult<i64>;

    /// Count of records per visibility: `(visible, ignored)`
    async fn visibility_counts(&self, user_id: Snowflake) -> RepoResult<(i64, i64)>;

    /// Count of all stored records
    async fn count(&self) -> RepoResult<i64>;
}

// ============================================================================
// Settings Repository
// ============================================================================

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Insert only if no row exists for the user; returns true if inserted
    async fn insert_if_absent(&self, settings: &Settings) -> RepoResult<bool>;

    /// Find a user's settings
    async fn find(&self, user_id: Snowflake) -> RepoResult<Option<Settings>>;

    /// Change the graph preference, creating the row with defaults if needed
    async fn set_graph_type(&self, user_id: Snowflake, graph_type: GraphType) -> RepoResult<()>;

    /// Change the mention preference, creating the row with defaults if needed
    async fn set_mention_for_stats(&self, user_id: Snowflake, enabled: bool) -> RepoResult<()>;
}

// ============================================================================
// Icon Repository
// ============================================================================

#[async_trait]
pub trait IconRepository: Send + Sync {
    async fn find(&self, game: &str) -> RepoResult<Option<IconRecord>>;

    /// Insert or replace the icon for a game
    async fn upsert(&self, icon: &IconRecord) -> RepoResult<()>;

    async fn count(&self) -> RepoResult<i64>;
}

// ============================================================================
// Blacklist Repository
// ============================================================================

#[async_trait]
pub trait BlacklistRepository: Send + Sync {
    async fn contains(&self, game: &str) -> RepoResult<bool>;

    /// Returns true if the game was newly blacklisted
    async fn insert(&self, game: &str) -> RepoResult<bool>;
}
