//! Settings <-> model mapper

use stat_core::entities::{GraphType, Settings};
use stat_core::value_objects::Snowflake;

use crate::models::SettingsModel;

impl From<SettingsModel> for Settings {
    fn from(model: SettingsModel) -> Self {
        let graph_type = model.graph_type.parse().unwrap_or_else(|_| {
            tracing::warn!(
                user_id = model.user_id,
                graph_type = %model.graph_type,
                "Unknown graph type in storage, using default"
            );
            GraphType::default()
        });

        Settings {
            user_id: Snowflake::new(model.user_id),
            graph_type,
            mention_for_stats: model.mention_for_stats,
        }
    }
}
