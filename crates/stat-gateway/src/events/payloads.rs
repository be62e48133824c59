//! Event payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stat_core::Snowflake;
use stat_service::MemberPresence;

/// The bot gained access to a group, with its current member list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAvailableEvent {
    pub group_id: Snowflake,
    #[serde(default)]
    pub members: Vec<MemberPresence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The bot left or lost a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRemovedEvent {
    pub group_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A user joined or left a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEvent {
    pub user_id: Snowflake,
    pub group_id: Snowflake,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A user's activity changed; `activity: null` means they stopped playing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUpdateEvent {
    pub user_id: Snowflake,
    /// Group the update was delivered through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Snowflake>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}
