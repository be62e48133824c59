//! Service context - dependency container for the tracker
//!
//! Holds the store handles and the engine components wired on top of them.

use std::sync::Arc;

use stat_core::traits::{
    BlacklistRepository, IconRepository, SettingsRepository, StatRepository,
};
use stat_core::GraphType;
use stat_db::{
    MemoryStore, PgBlacklistRepository, PgIconRepository, PgPool, PgSettingsRepository,
    PgStatRepository,
};

use crate::dto::SummaryResponse;

use super::accumulator::StatAccumulator;
use super::error::{ServiceError, ServiceResult};
use super::registry::PresenceRegistry;
use super::settings::SettingsGate;

/// Service context containing all dependencies
///
/// There is one registry per context; clones share it.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    stat_repo: Arc<dyn StatRepository>,
    settings_repo: Arc<dyn SettingsRepository>,
    icon_repo: Arc<dyn IconRepository>,
    blacklist_repo: Arc<dyn BlacklistRepository>,

    // Engine
    accumulator: Arc<StatAccumulator>,
    gate: Arc<SettingsGate>,
    registry: Arc<PresenceRegistry>,
}

impl ServiceContext {
    /// Wire the engine on top of the given stores
    pub fn new(
        stat_repo: Arc<dyn StatRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        icon_repo: Arc<dyn IconRepository>,
        blacklist_repo: Arc<dyn BlacklistRepository>,
        default_graph: GraphType,
    ) -> Self {
        let accumulator = Arc::new(StatAccumulator::new(
            Arc::clone(&stat_repo),
            Arc::clone(&icon_repo),
        ));
        let gate = Arc::new(SettingsGate::new(
            Arc::clone(&settings_repo),
            Arc::clone(&icon_repo),
            Arc::clone(&blacklist_repo),
            default_graph,
        ));
        let registry = Arc::new(PresenceRegistry::new(
            Arc::clone(&accumulator),
            Arc::clone(&gate),
        ));

        Self {
            stat_repo,
            settings_repo,
            icon_repo,
            blacklist_repo,
            accumulator,
            gate,
            registry,
        }
    }

    /// Context backed by a single in-process store
    pub fn in_memory(store: Arc<MemoryStore>, default_graph: GraphType) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            default_graph,
        )
    }

    /// Context backed by PostgreSQL
    pub fn postgres(pool: PgPool, default_graph: GraphType) -> Self {
        Self::new(
            Arc::new(PgStatRepository::new(pool.clone())),
            Arc::new(PgSettingsRepository::new(pool.clone())),
            Arc::new(PgIconRepository::new(pool.clone())),
            Arc::new(PgBlacklistRepository::new(pool)),
            default_graph,
        )
    }

    // === Repositories ===

    pub fn stat_repo(&self) -> &dyn StatRepository {
        self.stat_repo.as_ref()
    }

    pub fn settings_repo(&self) -> &dyn SettingsRepository {
        self.settings_repo.as_ref()
    }

    pub fn icon_repo(&self) -> &dyn IconRepository {
        self.icon_repo.as_ref()
    }

    pub fn blacklist_repo(&self) -> &dyn BlacklistRepository {
        self.blacklist_repo.as_ref()
    }

    // === Engine ===

    pub fn accumulator(&self) -> &StatAccumulator {
        self.accumulator.as_ref()
    }

    pub fn settings(&self) -> &SettingsGate {
        self.gate.as_ref()
    }

    pub fn registry(&self) -> &PresenceRegistry {
        self.registry.as_ref()
    }

    /// Shared handle to the registry, for tasks that outlive a borrow
    pub fn registry_handle(&self) -> Arc<PresenceRegistry> {
        Arc::clone(&self.registry)
    }

    /// Process-wide totals including live tracking counters
    pub async fn summary(&self) -> ServiceResult<SummaryResponse> {
        self.accumulator
            .global_summary(self.registry.user_count())
            .await
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("registry", &self.registry)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom stores
pub struct ServiceContextBuilder {
    stat_repo: Option<Arc<dyn StatRepository>>,
    settings_repo: Option<Arc<dyn SettingsRepository>>,
    icon_repo: Option<Arc<dyn IconRepository>>,
    blacklist_repo: Option<Arc<dyn BlacklistRepository>>,
    default_graph: GraphType,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            stat_repo: None,
            settings_repo: None,
            icon_repo: None,
            blacklist_repo: None,
            default_graph: GraphType::default(),
        }
    }

    pub fn stat_repo(mut self, repo: Arc<dyn StatRepository>) -> Self {
        self.stat_repo = Some(repo);
        self
    }

    pub fn settings_repo(mut self, repo: Arc<dyn SettingsRepository>) -> Self {
        self.settings_repo = Some(repo);
        self
    }

    pub fn icon_repo(mut self, repo: Arc<dyn IconRepository>) -> Self {
        self.icon_repo = Some(repo);
        self
    }

    pub fn blacklist_repo(mut self, repo: Arc<dyn BlacklistRepository>) -> Self {
        self.blacklist_repo = Some(repo);
        self
    }

    pub fn default_graph(mut self, graph_type: GraphType) -> Self {
        self.default_graph = graph_type;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any store is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.stat_repo
                .ok_or_else(|| ServiceError::validation("stat_repo is required"))?,
            self.settings_repo
                .ok_or_else(|| ServiceError::validation("settings_repo is required"))?,
            self.icon_repo
                .ok_or_else(|| ServiceError::validation("icon_repo is required"))?,
            self.blacklist_repo
                .ok_or_else(|| ServiceError::validation("blacklist_repo is required"))?,
            self.default_graph,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
