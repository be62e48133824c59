//! Stat accumulator
//!
//! Converts closed sessions into increments on the persisted per-game
//! totals and answers the aggregate queries reporting needs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error, instrument};

use stat_core::traits::{IconRepository, StatRepository};
use stat_core::{Snowflake, StatQuery, StatRecord};

use validator::Validate;

use crate::dto::{GameName, StatEntryResponse, SummaryResponse, UserStatsResponse};

use super::error::ServiceResult;

/// Outcome of committing a session to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommit {
    /// The increment was stored
    Recorded,
    /// Nothing to store: the session had no positive length
    Empty,
    /// The store failed; the increment is gone
    Lost,
}

/// Persists session lengths and reads back their aggregates
pub struct StatAccumulator {
    stats: Arc<dyn StatRepository>,
    icons: Arc<dyn IconRepository>,
    lost: AtomicU64,
}

impl StatAccumulator {
    pub fn new(stats: Arc<dyn StatRepository>, icons: Arc<dyn IconRepository>) -> Self {
        Self {
            stats,
            icons,
            lost: AtomicU64::new(0),
        }
    }

    /// Add a closed session to the `(user, activity)` total.
    ///
    /// Store failures are logged and counted, never returned: the caller's
    /// in-memory transition has already happened and is not rolled back.
    #[instrument(skip(self), fields(elapsed_ms = elapsed.num_milliseconds()))]
    pub async fn record_session(
        &self,
        user_id: Snowflake,
        activity: &str,
        elapsed: Duration,
    ) -> SessionCommit {
        if elapsed <= Duration::zero() {
            debug!(user_id = %user_id, activity, "Empty session, nothing to record");
            return SessionCommit::Empty;
        }

        match self.stats.add_duration(user_id, activity, elapsed).await {
            Ok(record) => {
                debug!(
                    user_id = %user_id,
                    activity,
                    total_ms = record.duration_ms,
                    "Session recorded"
                );
                SessionCommit::Recorded
            }
            Err(e) => {
                self.lost.fetch_add(1, Ordering::Relaxed);
                error!(
                    user_id = %user_id,
                    activity,
                    elapsed_ms = elapsed.num_milliseconds(),
                    error = %e,
                    "Failed to record session, increment lost"
                );
                SessionCommit::Lost
            }
        }
    }

    /// Number of increments dropped because the store failed
    pub fn lost_increments(&self) -> u64 {
        self.lost.load(Ordering::Relaxed)
    }

    /// Visible play time of one user
    #[instrument(skip(self))]
    pub async fn total_duration(&self, user_id: Snowflake) -> ServiceResult<Duration> {
        Ok(self.stats.total_duration(Some(user_id)).await?)
    }

    /// Number of visible games one user has played
    #[instrument(skip(self))]
    pub async fn distinct_activity_count(&self, user_id: Snowflake) -> ServiceResult<i64> {
        Ok(self.stats.distinct_games(Some(user_id)).await?)
    }

    /// Visible play time across all users
    #[instrument(skip(self))]
    pub async fn global_total_duration(&self) -> ServiceResult<Duration> {
        Ok(self.stats.total_duration(None).await?)
    }

    /// Number of distinct visible games across all users
    #[instrument(skip(self))]
    pub async fn global_distinct_activity_count(&self) -> ServiceResult<i64> {
        Ok(self.stats.distinct_games(None).await?)
    }

    /// Hide or show a game in a user's stats; the duration is kept.
    /// Returns false if the user never played it.
    #[instrument(skip(self))]
    pub async fn set_ignored(
        &self,
        user_id: Snowflake,
        activity: &str,
        ignored: bool,
    ) -> ServiceResult<bool> {
        GameName::new(activity).validate()?;
        Ok(self.stats.set_ignored(user_id, activity, ignored).await?)
    }

    #[instrument(skip(self))]
    pub async fn user_stats(
        &self,
        user_id: Snowflake,
        query: &StatQuery,
    ) -> ServiceResult<Vec<StatRecord>> {
        Ok(self.stats.find_by_user(user_id, query).await?)
    }

    /// `(visible, ignored)` record counts for one user
    #[instrument(skip(self))]
    pub async fn visibility_counts(&self, user_id: Snowflake) -> ServiceResult<(i64, i64)> {
        Ok(self.stats.visibility_counts(user_id).await?)
    }

    /// Listing plus aggregates, as shown in a user's stat view
    #[instrument(skip(self))]
    pub async fn user_report(
        &self,
        user_id: Snowflake,
        query: &StatQuery,
    ) -> ServiceResult<UserStatsResponse> {
        let records = self.user_stats(user_id, query).await?;
        let total = self.total_duration(user_id).await?;
        let distinct_games = self.distinct_activity_count(user_id).await?;
        let (visible_count, ignored_count) = self.visibility_counts(user_id).await?;

        Ok(UserStatsResponse {
            user_id,
            total_duration_ms: total.num_milliseconds(),
            distinct_games,
            visible_count,
            ignored_count,
            stats: records.iter().map(StatEntryResponse::from).collect(),
        })
    }

    /// Process-wide totals
    #[instrument(skip(self))]
    pub async fn global_summary(&self, tracked_users: usize) -> ServiceResult<SummaryResponse> {
        Ok(SummaryResponse {
            tracked_users,
            stat_records: self.stats.count().await?,
            known_icons: self.icons.count().await?,
            total_duration_ms: self.global_total_duration().await?.num_milliseconds(),
            distinct_games: self.global_distinct_activity_count().await?,
            lost_increments: self.lost_increments(),
        })
    }
}

impl std::fmt::Debug for StatAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatAccumulator")
            .field("lost", &self.lost_increments())
            .finish()
    }
}
