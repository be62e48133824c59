//! Game icon database model

use sqlx::FromRow;

/// Database model for game_icons table
#[derive(Debug, Clone, FromRow)]
pub struct IconModel {
    pub game: String,
    pub location: String,
    pub color: Option<String>,
}
