//! In-process store
//!
//! Implements every store trait on top of `DashMap`, for tests and for
//! running the tracker without a database. Upserts go through the entry API
//! so they are atomic per key, like `ON CONFLICT` in the PostgreSQL store.

use async_trait::async_trait;
use chrono::Duration;
use dashmap::{DashMap, DashSet};

use stat_core::entities::{GraphType, IconRecord, Settings, StatQuery, StatRecord, StatSort};
use stat_core::traits::{
    BlacklistRepository, IconRepository, RepoResult, SettingsRepository, StatRepository,
};
use stat_core::value_objects::Snowflake;

/// Store held entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    stats: DashMap<(Snowflake, String), StatRecord>,
    settings: DashMap<Snowflake, Settings>,
    icons: DashMap<String, IconRecord>,
    blacklist: DashSet<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn visible(&self, user_id: Option<Snowflake>) -> impl Iterator<Item = StatRecord> + '_ {
        self.stats
            .iter()
            .filter(move |entry| !entry.ignored && user_id.map_or(true, |id| entry.user_id == id))
            .map(|entry| entry.value().clone())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("stats", &self.stats.len())
            .field("settings", &self.settings.len())
            .field("icons", &self.icons.len())
            .field("blacklist", &self.blacklist.len())
            .finish()
    }
}

#[async_trait]
impl StatRepository for MemoryStore {
    async fn add_duration(
        &self,
        user_id: Snowflake,
        game: &str,
        elapsed: Duration,
    ) -> RepoResult<StatRecord> {
        let record = self
            .stats
            .entry((user_id, game.to_string()))
            .and_modify(|record| record.add(elapsed))
            .or_insert_with(|| StatRecord::new(user_id, game, elapsed))
            .clone();
        Ok(record)
    }

    async fn find(&self, user_id: Snowflake, game: &str) -> RepoResult<Option<StatRecord>> {
        Ok(self
            .stats
            .get(&(user_id, game.to_string()))
            .map(|r| r.value().clone()))
    }

    async fn find_by_user(
        &self,
        user_id: Snowflake,
        query: &StatQuery,
    ) -> RepoResult<Vec<StatRecord>> {
        let mut records: Vec<StatRecord> = self
            .stats
            .iter()
            .filter(|entry| entry.user_id == user_id && query.admits(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        match query.sort {
            StatSort::Unsorted => {}
            StatSort::DurationDesc => records.sort_by(|a, b| {
                b.duration_ms
                    .cmp(&a.duration_ms)
                    .then_with(|| a.game.cmp(&b.game))
            }),
            StatSort::GameAsc => records.sort_by(|a, b| a.game.cmp(&b.game)),
        }

        if let Some(limit) = query.limit {
            records.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }

        Ok(records)
    }

    async fn set_ignored(&self, user_id: Snowflake, game: &str, ignored: bool) -> RepoResult<bool> {
        match self.stats.get_mut(&(user_id, game.to_string())) {
            Some(mut record) => {
                record.ignored = ignored;
                record.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn total_duration(&self, user_id: Option<Snowflake>) -> RepoResult<Duration> {
        let total_ms = self
            .visible(user_id)
            .fold(0i64, |acc, r| acc.saturating_add(r.duration_ms));
        Ok(Duration::milliseconds(total_ms))
    }

    async fn distinct_games(&self, user_id: Option<Snowflake>) -> RepoResult<i64> {
        let games: std::collections::HashSet<String> =
            self.visible(user_id).map(|r| r.game).collect();
        Ok(games.len() as i64)
    }

    async fn visibility_counts(&self, user_id: Snowflake) -> RepoResult<(i64, i64)> {
        let (visible, ignored) = self
            .stats
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .fold((0, 0), |(v, i), entry| {
                if entry.ignored {
                    (v, i + 1)
                } else {
                    (v + 1, i)
                }
            });
        Ok((visible, ignored))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(self.stats.len() as i64)
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn insert_if_absent(&self, settings: &Settings) -> RepoResult<bool> {
        let mut inserted = false;
        self.settings.entry(settings.user_id).or_insert_with(|| {
            inserted = true;
            settings.clone()
        });
        Ok(inserted)
    }

    async fn find(&self, user_id: Snowflake) -> RepoResult<Option<Settings>> {
        Ok(self.settings.get(&user_id).map(|s| s.value().clone()))
    }

    async fn set_graph_type(&self, user_id: Snowflake, graph_type: GraphType) -> RepoResult<()> {
        self.settings
            .entry(user_id)
            .or_insert_with(|| Settings::defaults(user_id))
            .graph_type = graph_type;
        Ok(())
    }

    async fn set_mention_for_stats(&self, user_id: Snowflake, enabled: bool) -> RepoResult<()> {
        self.settings
            .entry(user_id)
            .or_insert_with(|| Settings::defaults(user_id))
            .mention_for_stats = enabled;
        Ok(())
    }
}

#[async_trait]
impl IconRepository for MemoryStore {
    async fn find(&self, game: &str) -> RepoResult<Option<IconRecord>> {
        Ok(self.icons.get(game).map(|i| i.value().clone()))
    }

    async fn upsert(&self, icon: &IconRecord) -> RepoResult<()> {
        self.icons.insert(icon.game.clone(), icon.clone());
        Ok(())
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(self.icons.len() as i64)
    }
}

#[async_trait]
impl BlacklistRepository for MemoryStore {
    async fn contains(&self, game: &str) -> RepoResult<bool> {
        Ok(self.blacklist.contains(game))
    }

    async fn insert(&self, game: &str) -> RepoResult<bool> {
        Ok(self.blacklist.insert(game.to_string()))
    }
}
