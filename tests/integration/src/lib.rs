//! Integration test utilities for the game-time tracker
//!
//! This crate provides helpers for running end-to-end tests against
//! the event ingest and reporting API.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
