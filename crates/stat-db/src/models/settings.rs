//! User settings database model

use sqlx::FromRow;

/// Database model for user_settings table
#[derive(Debug, Clone, FromRow)]
pub struct SettingsModel {
    pub user_id: i64,
    pub graph_type: String,
    pub mention_for_stats: bool,
}
