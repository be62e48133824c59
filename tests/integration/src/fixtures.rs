//! Test fixtures and data generators
//!
//! Event builders in the wire format and typed views of API responses.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test ids
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique id for a user or group
pub fn unique_id() -> u64 {
    100_000_000_000_000_000 + COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Fixed reference instant so durations are exact
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// `base_time()` plus some minutes
pub fn at_minutes(minutes: i64) -> DateTime<Utc> {
    base_time() + Duration::minutes(minutes)
}

pub fn member_add(user_id: u64, group_id: u64, at: DateTime<Utc>) -> Value {
    json!({
        "t": "MEMBER_ADD",
        "d": { "user_id": user_id.to_string(), "group_id": group_id.to_string(), "timestamp": at }
    })
}

pub fn member_remove(user_id: u64, group_id: u64, at: DateTime<Utc>) -> Value {
    json!({
        "t": "MEMBER_REMOVE",
        "d": { "user_id": user_id.to_string(), "group_id": group_id.to_string(), "timestamp": at }
    })
}

pub fn bot_add(user_id: u64, group_id: u64) -> Value {
    json!({
        "t": "MEMBER_ADD",
        "d": { "user_id": user_id.to_string(), "group_id": group_id.to_string(), "is_bot": true }
    })
}

/// Presence change; `None` means the user stopped playing
pub fn presence(user_id: u64, activity: Option<&str>, at: DateTime<Utc>) -> Value {
    json!({
        "t": "PRESENCE_UPDATE",
        "d": { "user_id": user_id.to_string(), "activity": activity, "timestamp": at }
    })
}

pub fn group_available(group_id: u64, members: &[(u64, Option<&str>)], at: DateTime<Utc>) -> Value {
    let members: Vec<Value> = members
        .iter()
        .map(|(user_id, activity)| json!({ "user_id": user_id.to_string(), "activity": activity }))
        .collect();
    json!({
        "t": "GROUP_AVAILABLE",
        "d": { "group_id": group_id.to_string(), "members": members, "timestamp": at }
    })
}

pub fn group_removed(group_id: u64, at: DateTime<Utc>) -> Value {
    json!({
        "t": "GROUP_REMOVED",
        "d": { "group_id": group_id.to_string(), "timestamp": at }
    })
}

#[derive(Debug, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub tracked_users: usize,
    pub events_received: u64,
    pub events_applied: u64,
}

#[derive(Debug, Deserialize)]
pub struct IngestBody {
    pub queued: usize,
}

#[derive(Debug, Deserialize)]
pub struct StatEntryBody {
    pub game: String,
    pub duration_ms: i64,
    pub hours: f64,
    pub ignored: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserStatsBody {
    pub user_id: String,
    pub total_duration_ms: i64,
    pub distinct_games: i64,
    pub visible_count: i64,
    pub ignored_count: i64,
    pub stats: Vec<StatEntryBody>,
}

impl UserStatsBody {
    pub fn duration_of(&self, game: &str) -> Option<i64> {
        self.stats
            .iter()
            .find(|s| s.game == game)
            .map(|s| s.duration_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryBody {
    pub tracked_users: usize,
    pub stat_records: i64,
    pub total_duration_ms: i64,
    pub distinct_games: i64,
    pub lost_increments: u64,
}

#[derive(Debug, Deserialize)]
pub struct SettingsBody {
    pub user_id: String,
    pub graph_type: String,
    pub mention_for_stats: bool,
}

#[derive(Debug, Deserialize)]
pub struct PresenceBody {
    pub user_id: String,
    pub tracked: bool,
    pub anchor_group: Option<String>,
    #[serde(default)]
    pub other_groups: Vec<String>,
    pub engaged: bool,
    pub activity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IconBody {
    pub game: String,
    pub location: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// One minute in milliseconds
pub const MINUTE_MS: i64 = 60_000;
