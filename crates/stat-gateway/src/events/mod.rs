//! Tracker events
//!
//! Membership and presence events as delivered by the chat transport.
//! Events are tagged JSON: `{"t": "MEMBER_ADD", "d": {...}}`.

mod payloads;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stat_core::Snowflake;

pub use payloads::{GroupAvailableEvent, GroupRemovedEvent, MemberEvent, PresenceUpdateEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerEvent {
    GroupAvailable(GroupAvailableEvent),
    GroupRemoved(GroupRemovedEvent),
    MemberAdd(MemberEvent),
    MemberRemove(MemberEvent),
    PresenceUpdate(PresenceUpdateEvent),
}

impl TrackerEvent {
    /// Event name as it appears on the wire
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GroupAvailable(_) => "GROUP_AVAILABLE",
            Self::GroupRemoved(_) => "GROUP_REMOVED",
            Self::MemberAdd(_) => "MEMBER_ADD",
            Self::MemberRemove(_) => "MEMBER_REMOVE",
            Self::PresenceUpdate(_) => "PRESENCE_UPDATE",
        }
    }

    /// User the event is about, if it concerns a single user
    pub fn user_id(&self) -> Option<Snowflake> {
        match self {
            Self::MemberAdd(e) | Self::MemberRemove(e) => Some(e.user_id),
            Self::PresenceUpdate(e) => Some(e.user_id),
            Self::GroupAvailable(_) | Self::GroupRemoved(_) => None,
        }
    }

    /// When the event happened; events without a timestamp happen on receipt
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::GroupAvailable(e) => e.timestamp,
            Self::GroupRemoved(e) => e.timestamp,
            Self::MemberAdd(e) | Self::MemberRemove(e) => e.timestamp,
            Self::PresenceUpdate(e) => e.timestamp,
        }
    }
}
