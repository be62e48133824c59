//! Event dispatcher
//!
//! Tracker events are spread over a fixed set of workers, each draining its
//! own bounded channel. A user's events always go to the same worker, so
//! they apply in arrival order, while different users proceed in parallel.
//! Group events fan out: each worker handles the members it owns, and the
//! event counts as applied once every part is done.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use stat_core::Snowflake;
use stat_service::{MemberPresence, PresenceRegistry};

use crate::events::TrackerEvent;

/// Counters shared between the sender side and the workers
#[derive(Debug, Default)]
struct DispatchStats {
    received: AtomicU64,
    applied: AtomicU64,
}

/// Error returned when the dispatcher is no longer running
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Event dispatcher is not running")]
pub struct DispatcherClosed;

/// Parts of a fanned-out event still in flight
#[derive(Debug)]
struct FanOut {
    remaining: AtomicUsize,
}

impl FanOut {
    fn new(parts: usize) -> Arc<Self> {
        Arc::new(Self {
            remaining: AtomicUsize::new(parts),
        })
    }

    /// Mark one part done; true for the last one
    fn finish(&self) -> bool {
        self.remaining.fetch_sub(1, Ordering::AcqRel) == 1
    }
}

/// Unit of work for one worker
#[derive(Debug)]
enum Job {
    /// Event about a single user
    User {
        event: TrackerEvent,
        at: DateTime<Utc>,
    },
    /// The members of a group snapshot this worker owns
    GroupMembers {
        group_id: Snowflake,
        members: Vec<MemberPresence>,
        at: DateTime<Utc>,
        done: Arc<FanOut>,
    },
    /// A group removal, applied to the users this worker owns
    GroupRemoved {
        group_id: Snowflake,
        at: DateTime<Utc>,
        done: Arc<FanOut>,
    },
}

/// Worker that owns `user_id` out of `workers`
pub fn worker_index(user_id: Snowflake, workers: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    user_id.hash(&mut hasher);
    (hasher.finish() % workers.max(1) as u64) as usize
}

/// Cloneable handle used to queue events
#[derive(Debug, Clone)]
pub struct EventSender {
    workers: Vec<mpsc::Sender<Job>>,
    stats: Arc<DispatchStats>,
}

impl EventSender {
    /// Queue an event, waiting for room if a worker's buffer is full.
    /// Events without a timestamp are stamped here.
    pub async fn send(&self, event: TrackerEvent) -> Result<(), DispatcherClosed> {
        let at = event.timestamp().unwrap_or_else(Utc::now);

        match event {
            TrackerEvent::GroupAvailable(group) => {
                let mut parts: Vec<Vec<MemberPresence>> = vec![Vec::new(); self.workers.len()];
                for member in group.members {
                    parts[self.worker_for(member.user_id)].push(member);
                }
                let done = FanOut::new(self.workers.len());
                for (tx, members) in self.workers.iter().zip(parts) {
                    let job = Job::GroupMembers {
                        group_id: group.group_id,
                        members,
                        at,
                        done: Arc::clone(&done),
                    };
                    tx.send(job).await.map_err(|_| DispatcherClosed)?;
                }
            }
            TrackerEvent::GroupRemoved(group) => {
                let done = FanOut::new(self.workers.len());
                for tx in &self.workers {
                    let job = Job::GroupRemoved {
                        group_id: group.group_id,
                        at,
                        done: Arc::clone(&done),
                    };
                    tx.send(job).await.map_err(|_| DispatcherClosed)?;
                }
            }
            event => {
                let index = event.user_id().map_or(0, |id| self.worker_for(id));
                self.workers[index]
                    .send(Job::User { event, at })
                    .await
                    .map_err(|_| DispatcherClosed)?;
            }
        }

        self.stats.received.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn worker_for(&self, user_id: Snowflake) -> usize {
        worker_index(user_id, self.workers.len())
    }

    /// Events accepted so far
    pub fn received(&self) -> u64 {
        self.stats.received.load(Ordering::Relaxed)
    }

    /// Events whose every part has been applied
    pub fn applied(&self) -> u64 {
        self.stats.applied.load(Ordering::Relaxed)
    }

    /// Free slots across all worker buffers
    pub fn capacity(&self) -> usize {
        self.workers.iter().map(mpsc::Sender::capacity).sum()
    }

    /// Number of workers
    pub fn workers(&self) -> usize {
        self.workers.len()
    }
}

/// One worker: applies its own queue in order
struct Worker {
    index: usize,
    workers: usize,
    registry: Arc<PresenceRegistry>,
    rx: mpsc::Receiver<Job>,
    stats: Arc<DispatchStats>,
}

impl Worker {
    async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            let done = match job {
                Job::User { event, at } => {
                    apply_at(&self.registry, event, at).await;
                    None
                }
                Job::GroupMembers {
                    group_id,
                    members,
                    at,
                    done,
                } => {
                    for member in &members {
                        self.registry
                            .on_group_member_available(group_id, member, at)
                            .await;
                    }
                    tracing::debug!(worker = self.index, group_id = %group_id, members = members.len(), "Group snapshot part applied");
                    Some(done)
                }
                Job::GroupRemoved { group_id, at, done } => {
                    let (index, workers) = (self.index, self.workers);
                    self.registry
                        .on_group_removed_for(group_id, at, move |user_id| {
                            worker_index(user_id, workers) == index
                        })
                        .await;
                    Some(done)
                }
            };

            if done.map_or(true, |fan_out| fan_out.finish()) {
                self.stats.applied.fetch_add(1, Ordering::Relaxed);
            }
        }
        tracing::debug!(worker = self.index, "Dispatch worker stopped");
    }
}

/// Worker pool applying events to the registry
pub struct EventDispatcher {
    workers: Vec<Worker>,
    stats: Arc<DispatchStats>,
}

impl EventDispatcher {
    /// Create a dispatcher with `workers` workers, each buffering up to
    /// `buffer` jobs, and the sender that feeds it
    pub fn channel(
        registry: Arc<PresenceRegistry>,
        workers: usize,
        buffer: usize,
    ) -> (EventSender, Self) {
        let count = workers.max(1);
        let stats = Arc::new(DispatchStats::default());
        let (senders, workers): (Vec<_>, Vec<_>) = (0..count)
            .map(|index| {
                let (tx, rx) = mpsc::channel(buffer.max(1));
                let worker = Worker {
                    index,
                    workers: count,
                    registry: Arc::clone(&registry),
                    rx,
                    stats: Arc::clone(&stats),
                };
                (tx, worker)
            })
            .unzip();

        let sender = EventSender {
            workers: senders,
            stats: Arc::clone(&stats),
        };
        (sender, Self { workers, stats })
    }

    /// Spawn the workers. The returned task ends once every sender is
    /// dropped and every queue is drained.
    pub fn start(self) -> JoinHandle<()> {
        tracing::info!(workers = self.workers.len(), "Event dispatcher started");
        let stats = self.stats;
        let mut set = JoinSet::new();
        for worker in self.workers {
            set.spawn(worker.run());
        }

        tokio::spawn(async move {
            while let Some(result) = set.join_next().await {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Dispatch worker failed");
                }
            }
            tracing::info!(
                applied = stats.applied.load(Ordering::Relaxed),
                "Event dispatcher stopped"
            );
        })
    }
}

/// Apply one event to the registry, stamping it now if it has no timestamp
pub async fn apply(registry: &PresenceRegistry, event: TrackerEvent) {
    let at = event.timestamp().unwrap_or_else(Utc::now);
    apply_at(registry, event, at).await;
}

async fn apply_at(registry: &PresenceRegistry, event: TrackerEvent, at: DateTime<Utc>) {
    tracing::trace!(event = event.name(), user_id = ?event.user_id(), "Dispatching event");

    match event {
        TrackerEvent::GroupAvailable(group) => {
            registry
                .on_group_available(group.group_id, &group.members, at)
                .await;
        }
        TrackerEvent::GroupRemoved(group) => {
            registry.on_group_removed(group.group_id, at).await;
        }
        TrackerEvent::MemberAdd(member) => {
            registry
                .on_membership_observed(member.user_id, member.group_id, member.is_bot)
                .await;
        }
        TrackerEvent::MemberRemove(member) => {
            registry
                .on_membership_removed_at(member.user_id, member.group_id, at)
                .await;
        }
        TrackerEvent::PresenceUpdate(presence) => {
            if presence.is_bot {
                tracing::debug!(user_id = %presence.user_id, "Ignoring presence of automated account");
                return;
            }
            // A presence delivered through a group proves the membership
            if let Some(group_id) = presence.group_id {
                registry
                    .on_membership_observed(presence.user_id, group_id, false)
                    .await;
            }
            registry
                .on_presence_update(presence.user_id, presence.activity.as_deref(), at)
                .await;
        }
    }
}
