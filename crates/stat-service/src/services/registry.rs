//! Presence registry
//!
//! Tracks every user the bot shares at least one group with, exactly once,
//! and turns membership and presence events into persisted sessions.
//!
//! Lock discipline:
//! - the map shard lock is held only for the lookup, insert or removal
//!   itself, never across an `.await`
//! - each user's state sits behind its own async mutex, held for the whole
//!   event including the store write
//! - a record is marked removed under its own lock before it leaves the
//!   map; anyone who then locks it looks the user up again

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument};

use stat_core::Snowflake;

use super::accumulator::{SessionCommit, StatAccumulator};
use super::settings::SettingsGate;
use super::state::{GroupRemoval, Session, UserSnapshot, UserState};

type UserCell = Arc<Mutex<UserState>>;

/// One member as reported in a group snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPresence {
    pub user_id: Snowflake,
    #[serde(default)]
    pub is_bot: bool,
    /// Game the member is playing when the snapshot is taken
    #[serde(default)]
    pub activity: Option<String>,
}

impl MemberPresence {
    pub fn new(user_id: Snowflake) -> Self {
        Self {
            user_id,
            is_bot: false,
            activity: None,
        }
    }

    pub fn playing(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn bot(mut self) -> Self {
        self.is_bot = true;
        self
    }
}

/// Live per-user tracking state
pub struct PresenceRegistry {
    users: DashMap<Snowflake, UserCell>,
    accumulator: Arc<StatAccumulator>,
    gate: Arc<SettingsGate>,
}

impl PresenceRegistry {
    pub fn new(accumulator: Arc<StatAccumulator>, gate: Arc<SettingsGate>) -> Self {
        Self {
            users: DashMap::new(),
            accumulator,
            gate,
        }
    }

    /// Lock a tracked user's state, skipping records that were evicted
    /// while we waited
    async fn lock_user(&self, user_id: Snowflake) -> Option<(UserCell, OwnedMutexGuard<UserState>)> {
        loop {
            let cell = self.users.get(&user_id).map(|entry| Arc::clone(entry.value()))?;
            let state = Arc::clone(&cell).lock_owned().await;
            if !state.is_removed() {
                return Some((cell, state));
            }
        }
    }

    /// Take a record out of the map; the caller holds its lock
    fn evict(&self, cell: &UserCell, state: &mut UserState) {
        state.mark_removed();
        self.users
            .remove_if(&state.user_id(), |_, current| Arc::ptr_eq(current, cell));
    }

    fn user_ids(&self) -> Vec<Snowflake> {
        self.users.iter().map(|entry| *entry.key()).collect()
    }

    async fn close_session(&self, user_id: Snowflake, session: Session, at: DateTime<Utc>) -> SessionCommit {
        let elapsed = session.elapsed(at);
        let commit = self
            .accumulator
            .record_session(user_id, &session.activity, elapsed)
            .await;
        info!(
            user_id = %user_id,
            activity = %session.activity,
            elapsed_ms = elapsed.num_milliseconds(),
            ?commit,
            "Session closed"
        );
        commit
    }

    // === Membership ===

    /// Record that a user is in a group. Bots are never tracked.
    #[instrument(skip(self))]
    pub async fn on_membership_observed(&self, user_id: Snowflake, group_id: Snowflake, is_bot: bool) {
        if is_bot {
            debug!(user_id = %user_id, "Ignoring automated account");
            return;
        }

        loop {
            let existing = match self.users.entry(user_id) {
                Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
                Entry::Vacant(entry) => {
                    entry.insert(Arc::new(Mutex::new(UserState::new(user_id, group_id))));
                    None
                }
            };

            let Some(cell) = existing else {
                info!(user_id = %user_id, group_id = %group_id, "Tracking new user");
                self.gate.ensure_default_settings(user_id).await;
                return;
            };

            let mut state = cell.lock().await;
            if state.is_removed() {
                continue;
            }
            if state.add_group(group_id) {
                debug!(
                    user_id = %user_id,
                    group_id = %group_id,
                    groups = state.group_count(),
                    "Membership added"
                );
            }
            return;
        }
    }

    /// Drop a membership now
    pub async fn on_membership_removed(&self, user_id: Snowflake, group_id: Snowflake) -> GroupRemoval {
        self.on_membership_removed_at(user_id, group_id, Utc::now()).await
    }

    /// Drop a membership; `at` is used to cut or close the open session
    #[instrument(skip(self))]
    pub async fn on_membership_removed_at(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        at: DateTime<Utc>,
    ) -> GroupRemoval {
        let Some((cell, mut state)) = self.lock_user(user_id).await else {
            debug!(user_id = %user_id, group_id = %group_id, "Membership removed for untracked user");
            return GroupRemoval::NotMember;
        };

        let removal = state.remove_group(group_id);
        match removal {
            GroupRemoval::NotMember => {
                debug!(user_id = %user_id, group_id = %group_id, "Membership was not tracked");
            }
            GroupRemoval::Other => {
                if let Some((activity, elapsed)) = state.checkpoint(at) {
                    let commit = self
                        .accumulator
                        .record_session(user_id, &activity, elapsed)
                        .await;
                    debug!(
                        user_id = %user_id,
                        group_id = %group_id,
                        activity = %activity,
                        elapsed_ms = elapsed.num_milliseconds(),
                        ?commit,
                        "Session checkpointed"
                    );
                }
            }
            GroupRemoval::AnchorPromoted(anchor) => {
                debug!(
                    user_id = %user_id,
                    group_id = %group_id,
                    anchor = %anchor,
                    "Anchor group replaced"
                );
            }
            GroupRemoval::Last => {
                if let Some(session) = state.close() {
                    self.close_session(user_id, session, at).await;
                }
                self.evict(&cell, &mut state);
                info!(user_id = %user_id, group_id = %group_id, "User left last shared group");
            }
        }
        removal
    }

    /// Apply a full member list for a group the bot just gained access to.
    /// Returns how many members are tracked.
    #[instrument(skip(self, members), fields(members = members.len()))]
    pub async fn on_group_available(
        &self,
        group_id: Snowflake,
        members: &[MemberPresence],
        at: DateTime<Utc>,
    ) -> usize {
        let mut tracked = 0;
        for member in members {
            if self.on_group_member_available(group_id, member, at).await {
                tracked += 1;
            }
        }
        info!(group_id = %group_id, tracked, "Group snapshot applied");
        tracked
    }

    /// One member of a group snapshot: observe the membership and, if the
    /// member is playing and has no session yet, open one. Returns false
    /// for bots.
    pub async fn on_group_member_available(
        &self,
        group_id: Snowflake,
        member: &MemberPresence,
        at: DateTime<Utc>,
    ) -> bool {
        if member.is_bot {
            return false;
        }
        self.on_membership_observed(member.user_id, group_id, false)
            .await;

        let Some(activity) = member.activity.as_deref().filter(|a| !a.trim().is_empty()) else {
            return true;
        };
        let Some((_, mut state)) = self.lock_user(member.user_id).await else {
            return true;
        };
        if state.is_engaged() {
            debug!(user_id = %member.user_id, activity, "Snapshot activity ignored, session already open");
            return true;
        }
        state.open(activity, at);
        info!(user_id = %member.user_id, activity, "Session opened");
        true
    }

    /// Drop a whole group from every user in it. Returns how many users
    /// were members.
    pub async fn on_group_removed(&self, group_id: Snowflake, at: DateTime<Utc>) -> usize {
        self.on_group_removed_for(group_id, at, |_| true).await
    }

    /// Drop a group from the tracked users `owns` selects. Lets several
    /// workers split one removal between them.
    #[instrument(skip(self, owns))]
    pub async fn on_group_removed_for<F>(
        &self,
        group_id: Snowflake,
        at: DateTime<Utc>,
        owns: F,
    ) -> usize
    where
        F: Fn(Snowflake) -> bool + Send + Sync,
    {
        let mut affected = 0;
        for user_id in self.user_ids().into_iter().filter(|id| owns(*id)) {
            if self.on_membership_removed_at(user_id, group_id, at).await != GroupRemoval::NotMember {
                affected += 1;
            }
        }
        info!(group_id = %group_id, affected, "Group removed");
        affected
    }

    // === Presence ===

    /// A user started playing `activity`. A blank activity is a stop.
    #[instrument(skip(self))]
    pub async fn on_presence_start(&self, user_id: Snowflake, activity: &str, at: DateTime<Utc>) {
        if activity.trim().is_empty() {
            self.on_presence_stop(user_id, at).await;
            return;
        }

        let Some((_, mut state)) = self.lock_user(user_id).await else {
            debug!(user_id = %user_id, "Presence for untracked user");
            return;
        };

        if state.is_engaged_in(activity) {
            debug!(user_id = %user_id, activity, "Already playing");
            return;
        }

        if let Some(previous) = state.close() {
            self.close_session(user_id, previous, at).await;
        }
        state.open(activity, at);
        info!(user_id = %user_id, activity, "Session opened");
    }

    /// A user stopped playing
    #[instrument(skip(self))]
    pub async fn on_presence_stop(&self, user_id: Snowflake, at: DateTime<Utc>) {
        let Some((_, mut state)) = self.lock_user(user_id).await else {
            debug!(user_id = %user_id, "Presence for untracked user");
            return;
        };

        match state.close() {
            Some(session) => {
                self.close_session(user_id, session, at).await;
            }
            None => debug!(user_id = %user_id, "Stop without an open session"),
        }
    }

    /// Start or stop depending on whether an activity is reported
    pub async fn on_presence_update(
        &self,
        user_id: Snowflake,
        activity: Option<&str>,
        at: DateTime<Utc>,
    ) {
        match activity {
            Some(activity) => self.on_presence_start(user_id, activity, at).await,
            None => self.on_presence_stop(user_id, at).await,
        }
    }

    /// Close every open session at `at`. Returns how many were closed.
    #[instrument(skip(self))]
    pub async fn close_all_sessions(&self, at: DateTime<Utc>) -> usize {
        let mut closed = 0;
        for user_id in self.user_ids() {
            let Some((_, mut state)) = self.lock_user(user_id).await else {
                continue;
            };
            if let Some(session) = state.close() {
                self.close_session(user_id, session, at).await;
                closed += 1;
            }
        }
        info!(closed, "Open sessions closed");
        closed
    }

    // === Inspection ===

    pub async fn snapshot(&self, user_id: Snowflake) -> Option<UserSnapshot> {
        let (_, state) = self.lock_user(user_id).await?;
        Some(state.snapshot())
    }

    pub fn contains(&self, user_id: Snowflake) -> bool {
        self.users.contains_key(&user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Increments dropped because the store failed
    pub fn lost_increments(&self) -> u64 {
        self.accumulator.lost_increments()
    }
}

impl std::fmt::Debug for PresenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceRegistry")
            .field("users", &self.users.len())
            .field("lost_increments", &self.lost_increments())
            .finish()
    }
}
