//! Tracking services
//!
//! This module contains the presence state machine and the components it
//! persists through.

pub mod accumulator;
pub mod context;
pub mod error;
pub mod registry;
pub mod settings;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use accumulator::{SessionCommit, StatAccumulator};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use registry::{MemberPresence, PresenceRegistry};
pub use settings::SettingsGate;
pub use state::{GroupRemoval, Session, UserSnapshot, UserState};
