//! Settings and icon blacklist gate
//!
//! Owns per-user preferences and the icon reference data. First-sight
//! settings creation is a single insert-if-absent, so concurrent first
//! sightings of the same user create exactly one row.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use stat_core::traits::{BlacklistRepository, IconRepository, SettingsRepository};
use stat_core::{GraphType, IconRecord, Settings, Snowflake};

use validator::Validate;

use crate::dto::GameName;

use super::error::ServiceResult;

pub struct SettingsGate {
    settings: Arc<dyn SettingsRepository>,
    icons: Arc<dyn IconRepository>,
    blacklist: Arc<dyn BlacklistRepository>,
    default_graph: GraphType,
}

impl SettingsGate {
    pub fn new(
        settings: Arc<dyn SettingsRepository>,
        icons: Arc<dyn IconRepository>,
        blacklist: Arc<dyn BlacklistRepository>,
        default_graph: GraphType,
    ) -> Self {
        Self {
            settings,
            icons,
            blacklist,
            default_graph,
        }
    }

    fn defaults(&self, user_id: Snowflake) -> Settings {
        Settings::with_graph(user_id, self.default_graph)
    }

    /// Make sure the user has a settings row. Returns true if one was
    /// created; store failures are logged and reported as false.
    #[instrument(skip(self))]
    pub async fn ensure_default_settings(&self, user_id: Snowflake) -> bool {
        match self.settings.insert_if_absent(&self.defaults(user_id)).await {
            Ok(true) => {
                info!(user_id = %user_id, "Default settings created");
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to ensure default settings");
                false
            }
        }
    }

    /// A user's settings; defaults if none are stored
    #[instrument(skip(self))]
    pub async fn settings(&self, user_id: Snowflake) -> ServiceResult<Settings> {
        let stored = self.settings.find(user_id).await?;
        Ok(stored.unwrap_or_else(|| {
            debug!(user_id = %user_id, "No stored settings, using defaults");
            self.defaults(user_id)
        }))
    }

    #[instrument(skip(self))]
    pub async fn set_graph_type(&self, user_id: Snowflake, graph_type: GraphType) -> ServiceResult<()> {
        self.settings.set_graph_type(user_id, graph_type).await?;
        info!(user_id = %user_id, graph_type = %graph_type, "Graph preference changed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_mention_for_stats(&self, user_id: Snowflake, enabled: bool) -> ServiceResult<()> {
        self.settings.set_mention_for_stats(user_id, enabled).await?;
        info!(user_id = %user_id, enabled, "Mention preference changed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn is_icon_blacklisted(&self, activity: &str) -> ServiceResult<bool> {
        Ok(self.blacklist.contains(activity).await?)
    }

    /// Stop icon lookups for a game; returns true if newly blacklisted
    #[instrument(skip(self))]
    pub async fn blacklist_icon(&self, activity: &str) -> ServiceResult<bool> {
        GameName::new(activity).validate()?;
        Ok(self.blacklist.insert(activity).await?)
    }

    /// Icon for a game, or `None` if it has none or is blacklisted
    #[instrument(skip(self))]
    pub async fn icon(&self, activity: &str) -> ServiceResult<Option<IconRecord>> {
        if self.is_icon_blacklisted(activity).await? {
            return Ok(None);
        }
        Ok(self.icons.find(activity).await?)
    }

    #[instrument(skip(self))]
    pub async fn register_icon(&self, icon: &IconRecord) -> ServiceResult<()> {
        GameName::new(icon.game.as_str()).validate()?;
        Ok(self.icons.upsert(icon).await?)
    }
}

impl std::fmt::Debug for SettingsGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsGate")
            .field("default_graph", &self.default_graph)
            .finish()
    }
}
