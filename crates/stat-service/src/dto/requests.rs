//! Request DTOs for HTTP endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use stat_core::{GraphType, StatQuery, StatSort};

/// Rejects names made only of whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Must not be blank".into()));
    }
    Ok(())
}

// ============================================================================
// Game Names
// ============================================================================

/// A game name as it arrives from a path or command
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GameName {
    #[validate(
        length(min = 1, max = 256, message = "Game name must be 1-256 characters"),
        custom(function = "validate_not_blank")
    )]
    pub game: String,
}

impl GameName {
    pub fn new(game: impl Into<String>) -> Self {
        Self { game: game.into() }
    }
}

// ============================================================================
// Stat Requests
// ============================================================================

/// Query parameters for a stat listing
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StatsQueryRequest {
    #[serde(default)]
    pub include_ignored: bool,

    /// Most played first when absent
    pub sort: Option<StatSort>,

    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

impl StatsQueryRequest {
    pub fn to_query(&self) -> StatQuery {
        StatQuery {
            include_ignored: self.include_ignored,
            sort: self.sort.unwrap_or(StatSort::DurationDesc),
            limit: self.limit,
        }
    }
}

/// Hide or show one game
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetIgnoredRequest {
    pub ignored: bool,
}

// ============================================================================
// Settings Requests
// ============================================================================

/// Partial settings update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    pub graph_type: Option<GraphType>,
    pub mention_for_stats: Option<bool>,
}

// ============================================================================
// Icon Requests
// ============================================================================

/// Register or replace a game's icon
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterIconRequest {
    #[validate(
        length(min = 1, max = 2048, message = "Location must be 1-2048 characters"),
        custom(function = "validate_not_blank")
    )]
    pub location: String,

    /// Display color as `#rrggbb`
    #[validate(length(equal = 7, message = "Color must look like #rrggbb"))]
    pub color: Option<String>,
}
