//! Entity to DTO conversions

use stat_core::{Settings, StatRecord};

use crate::services::UserSnapshot;

use super::responses::{PresenceResponse, SettingsResponse, StatEntryResponse};

impl From<&StatRecord> for StatEntryResponse {
    fn from(record: &StatRecord) -> Self {
        Self {
            game: record.game.clone(),
            duration_ms: record.duration_ms,
            hours: record.hours(),
            ignored: record.ignored,
            updated_at: record.updated_at,
        }
    }
}

impl From<Settings> for SettingsResponse {
    fn from(settings: Settings) -> Self {
        Self {
            user_id: settings.user_id,
            graph_type: settings.graph_type,
            mention_for_stats: settings.mention_for_stats,
        }
    }
}

impl From<UserSnapshot> for PresenceResponse {
    fn from(snapshot: UserSnapshot) -> Self {
        let (activity, since) = match snapshot.session {
            Some(session) => (Some(session.activity), Some(session.since)),
            None => (None, None),
        };
        Self {
            user_id: snapshot.user_id,
            tracked: true,
            anchor_group: Some(snapshot.anchor_group),
            other_groups: snapshot.other_groups,
            engaged: activity.is_some(),
            activity,
            since,
        }
    }
}
