//! # stat-service
//!
//! Application layer: the presence registry that turns membership and
//! presence events into sessions, the accumulator that persists them, and
//! the DTOs served to reporting collaborators.

pub mod dto;
pub mod services;

pub use services::{
    GroupRemoval, MemberPresence, PresenceRegistry, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, Session, SessionCommit, SettingsGate, StatAccumulator,
    UserSnapshot, UserState,
};
