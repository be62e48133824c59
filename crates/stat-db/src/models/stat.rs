//! Game stat database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for game_stats table
#[derive(Debug, Clone, FromRow)]
pub struct StatModel {
    pub user_id: i64,
    pub game: String,
    pub duration_ms: i64,
    pub ignored: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Visible/ignored row counts for one user (from query)
#[derive(Debug, Clone, Copy, FromRow)]
pub struct VisibilityCountModel {
    pub visible: i64,
    pub ignored: i64,
}
