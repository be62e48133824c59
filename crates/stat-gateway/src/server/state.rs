//! Gateway state
//!
//! Application state shared by the HTTP handlers.

use std::sync::Arc;

use stat_common::AppConfig;
use stat_service::ServiceContext;

use crate::dispatch::EventSender;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with stores and the tracking engine
    service_context: Arc<ServiceContext>,
    /// Queue feeding the event dispatcher
    events: EventSender,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    pub fn new(service_context: ServiceContext, events: EventSender, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            events,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the event queue
    pub fn events(&self) -> &EventSender {
        &self.events
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("service_context", &self.service_context)
            .field("events", &self.events)
            .field("config", &"AppConfig")
            .finish()
    }
}
