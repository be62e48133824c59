//! # stat-gateway
//!
//! Event ingest and reporting server: receives membership and presence
//! events from the chat transport, feeds them to the tracking engine in
//! order, and serves stats and preferences over HTTP.

pub mod dispatch;
pub mod events;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod server;

pub use dispatch::{EventDispatcher, EventSender};
pub use events::TrackerEvent;
pub use server::{
    create_app, create_gateway_state, create_router, create_service_context, run, run_server,
    GatewayState,
};
