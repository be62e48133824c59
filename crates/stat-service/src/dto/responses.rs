//! Response DTOs for the reporting endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stat_core::{GraphType, Snowflake};

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Stat Responses
// ============================================================================

/// One `(user, game)` total
#[derive(Debug, Clone, Serialize)]
pub struct StatEntryResponse {
    pub game: String,
    pub duration_ms: i64,
    pub hours: f64,
    pub ignored: bool,
    pub updated_at: DateTime<Utc>,
}

/// A user's stat listing with its aggregates
#[derive(Debug, Clone, Serialize)]
pub struct UserStatsResponse {
    pub user_id: Snowflake,
    /// Sum over visible records only
    pub total_duration_ms: i64,
    pub distinct_games: i64,
    pub visible_count: i64,
    pub ignored_count: i64,
    pub stats: Vec<StatEntryResponse>,
}

/// Process-wide totals
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub tracked_users: usize,
    pub stat_records: i64,
    pub known_icons: i64,
    pub total_duration_ms: i64,
    pub distinct_games: i64,
    pub lost_increments: u64,
}

// ============================================================================
// Settings Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub user_id: Snowflake,
    pub graph_type: GraphType,
    pub mention_for_stats: bool,
}

// ============================================================================
// Presence Responses
// ============================================================================

/// Live tracking state of a user
#[derive(Debug, Clone, Serialize)]
pub struct PresenceResponse {
    pub user_id: Snowflake,
    pub tracked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_group: Option<Snowflake>,
    pub other_groups: Vec<Snowflake>,
    pub engaged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
}

impl PresenceResponse {
    /// Response for a user the registry does not know
    pub fn untracked(user_id: Snowflake) -> Self {
        Self {
            user_id,
            tracked: false,
            anchor_group: None,
            other_groups: Vec::new(),
            engaged: false,
            activity: None,
            since: None,
        }
    }
}
