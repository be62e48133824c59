//! Per-user tracking state
//!
//! A `UserState` holds the groups a user shares with the bot and the
//! session the user is currently engaged in. It is pure state; persistence
//! is driven by the registry while it holds the record's lock.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::seq::IteratorRandom;
use serde::Serialize;

use stat_core::Snowflake;

/// An open engagement in one activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub activity: String,
    pub since: DateTime<Utc>,
}

impl Session {
    pub fn new(activity: impl Into<String>, since: DateTime<Utc>) -> Self {
        Self {
            activity: activity.into(),
            since,
        }
    }

    /// Time spent in the session up to `at`; zero if `at` is not after `since`
    pub fn elapsed(&self, at: DateTime<Utc>) -> Duration {
        (at - self.since).max(Duration::zero())
    }
}

/// What removing a group did to a user's membership set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRemoval {
    /// The user was not in that group (or is not tracked)
    NotMember,
    /// A non-anchor group was dropped
    Other,
    /// The anchor was dropped and the contained group took its place
    AnchorPromoted(Snowflake),
    /// The last group was dropped; the user is no longer tracked
    Last,
}

/// Tracking state of one user
#[derive(Debug)]
pub struct UserState {
    user_id: Snowflake,
    anchor_group: Snowflake,
    other_groups: HashSet<Snowflake>,
    session: Option<Session>,
    /// Set once the record has been taken out of the registry
    removed: bool,
}

impl UserState {
    /// New state for a user first seen in `group`
    pub fn new(user_id: Snowflake, group: Snowflake) -> Self {
        Self {
            user_id,
            anchor_group: group,
            other_groups: HashSet::new(),
            session: None,
            removed: false,
        }
    }

    pub fn user_id(&self) -> Snowflake {
        self.user_id
    }

    pub fn anchor_group(&self) -> Snowflake {
        self.anchor_group
    }

    pub fn other_groups(&self) -> &HashSet<Snowflake> {
        &self.other_groups
    }

    /// Every group the user is in, anchor first
    pub fn groups(&self) -> impl Iterator<Item = Snowflake> + '_ {
        std::iter::once(self.anchor_group).chain(self.other_groups.iter().copied())
    }

    pub fn group_count(&self) -> usize {
        1 + self.other_groups.len()
    }

    pub fn is_member(&self, group: Snowflake) -> bool {
        self.anchor_group == group || self.other_groups.contains(&group)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_engaged(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_engaged_in(&self, activity: &str) -> bool {
        self.session.as_ref().is_some_and(|s| s.activity == activity)
    }

    /// Record a membership; returns false if it was already known
    pub fn add_group(&mut self, group: Snowflake) -> bool {
        if group == self.anchor_group {
            return false;
        }
        self.other_groups.insert(group)
    }

    /// Drop a membership, promoting an arbitrary remaining group if the
    /// anchor goes
    pub fn remove_group(&mut self, group: Snowflake) -> GroupRemoval {
        if group != self.anchor_group {
            return if self.other_groups.remove(&group) {
                GroupRemoval::Other
            } else {
                GroupRemoval::NotMember
            };
        }

        let promoted = self
            .other_groups
            .iter()
            .copied()
            .choose(&mut rand::thread_rng());

        match promoted {
            Some(next) => {
                self.other_groups.remove(&next);
                self.anchor_group = next;
                GroupRemoval::AnchorPromoted(next)
            }
            None => GroupRemoval::Last,
        }
    }

    /// Begin a session, replacing any open one
    pub fn open(&mut self, activity: impl Into<String>, at: DateTime<Utc>) {
        self.session = Some(Session::new(activity, at));
    }

    /// End the open session, if any, and hand it back
    pub fn close(&mut self) -> Option<Session> {
        self.session.take()
    }

    /// Cut the open session at `at`: returns the activity and the time
    /// since the last cut, and restarts the session clock at `at`
    pub fn checkpoint(&mut self, at: DateTime<Utc>) -> Option<(String, Duration)> {
        let session = self.session.as_mut()?;
        let elapsed = session.elapsed(at);
        session.since = session.since.max(at);
        Some((session.activity.clone(), elapsed))
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub(crate) fn is_removed(&self) -> bool {
        self.removed
    }

    /// Detached copy for reporting
    pub fn snapshot(&self) -> UserSnapshot {
        let mut other_groups: Vec<Snowflake> = self.other_groups.iter().copied().collect();
        other_groups.sort_unstable();
        UserSnapshot {
            user_id: self.user_id,
            anchor_group: self.anchor_group,
            other_groups,
            session: self.session.clone(),
        }
    }
}

/// Read-only copy of a user's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSnapshot {
    pub user_id: Snowflake,
    pub anchor_group: Snowflake,
    pub other_groups: Vec<Snowflake>,
    pub session: Option<Session>,
}

impl UserSnapshot {
    /// Every group in the snapshot, anchor first
    pub fn groups(&self) -> Vec<Snowflake> {
        std::iter::once(self.anchor_group)
            .chain(self.other_groups.iter().copied())
            .collect()
    }
}
