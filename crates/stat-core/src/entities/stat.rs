//! Stat entity - accumulated play time for one (user, game) pair

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Milliseconds in one hour
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Accumulated duration for a `(user_id, game)` pair.
///
/// Rows are created on the first closed session and only ever grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    pub user_id: Snowflake,
    pub game: String,
    pub duration_ms: i64,
    /// Hidden from default views, still counted in storage
    pub ignored: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StatRecord {
    /// Create a new, visible record with the given starting duration
    pub fn new(user_id: Snowflake, game: impl Into<String>, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            game: game.into(),
            duration_ms: duration.num_milliseconds().max(0),
            ignored: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Accumulated duration
    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::milliseconds(self.duration_ms)
    }

    /// Accumulated duration in fractional hours (what reports display)
    pub fn hours(&self) -> f64 {
        self.duration_ms as f64 / MS_PER_HOUR
    }

    /// Add a closed session to the running total
    pub fn add(&mut self, elapsed: Duration) {
        self.duration_ms = self
            .duration_ms
            .saturating_add(elapsed.num_milliseconds().max(0));
        self.updated_at = Utc::now();
    }

    /// Check if this record is for a specific game
    #[inline]
    pub fn is_game(&self, game: &str) -> bool {
        self.game == game
    }
}

/// Ordering applied to a user's stat listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatSort {
    /// Storage order, unspecified
    #[default]
    Unsorted,
    /// Most played first
    DurationDesc,
    /// Alphabetical by game
    GameAsc,
}

/// Range query over one user's stat records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatQuery {
    pub include_ignored: bool,
    pub sort: StatSort,
    pub limit: Option<i64>,
}

impl StatQuery {
    /// Visible records, most played first
    pub fn top(limit: i64) -> Self {
        Self {
            include_ignored: false,
            sort: StatSort::DurationDesc,
            limit: Some(limit),
        }
    }

    /// Whether a record passes the visibility filter
    #[inline]
    pub fn admits(&self, record: &StatRecord) -> bool {
        self.include_ignored || !record.ignored
    }
}
