//! Gateway server setup
//!
//! Builds the store backend, the tracking engine and the HTTP routes, and
//! runs them until shutdown.

mod state;

pub use state::GatewayState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use stat_common::{AppConfig, AppError, StoreBackend};
use stat_db::MemoryStore;
use stat_service::ServiceContext;

use crate::dispatch::EventDispatcher;
use crate::handlers::{events, health, icons, stats, users};

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/events", post(events::ingest_event))
        .route("/events/batch", post(events::ingest_batch))
        .route("/stats", get(stats::summary))
        .route("/users/:user_id/stats", get(users::get_user_stats))
        .route("/users/:user_id/stats/:game/ignored", put(users::set_ignored))
        .route(
            "/users/:user_id/settings",
            get(users::get_settings).patch(users::update_settings),
        )
        .route("/users/:user_id/presence", get(users::get_presence))
        .route("/icons/:game", get(icons::get_icon).put(icons::put_icon))
        .route("/icons/:game/blacklist", put(icons::blacklist_icon))
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the service context on the configured store backend
pub async fn create_service_context(config: &AppConfig) -> Result<ServiceContext, AppError> {
    let default_graph = config.tracker.default_graph_type;

    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; stats are lost on restart");
            Ok(ServiceContext::in_memory(
                Arc::new(MemoryStore::new()),
                default_graph,
            ))
        }
        StoreBackend::Postgres => {
            let database = config
                .store
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is required".to_string()))?;

            tracing::info!("Connecting to PostgreSQL...");
            let pool = stat_db::create_pool(&stat_db::DatabaseConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            stat_db::run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            tracing::info!("PostgreSQL connection established");

            Ok(ServiceContext::postgres(pool, default_graph))
        }
    }
}

/// Initialize all dependencies and create `GatewayState`.
///
/// The returned dispatcher is not started yet.
pub async fn create_gateway_state(
    config: AppConfig,
) -> Result<(GatewayState, EventDispatcher), AppError> {
    let service_context = create_service_context(&config).await?;
    let (events, dispatcher) = EventDispatcher::channel(
        service_context.registry_handle(),
        config.tracker.dispatch_workers,
        config.tracker.event_buffer,
    );

    Ok((GatewayState::new(service_context, events, config), dispatcher))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Accepting events on http://{}/events", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway with configuration.
///
/// On shutdown the queued events are drained and every open session is
/// closed, so play time up to the shutdown is kept.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.server.address();
    let addr = tokio::net::lookup_host(&address)
        .await
        .map_err(|e| AppError::Config(format!("Invalid server address {address}: {e}")))?
        .next()
        .ok_or_else(|| AppError::Config(format!("Server address {address} did not resolve")))?;

    let (state, dispatcher) = create_gateway_state(config).await?;
    let registry = state.service_context().registry_handle();
    let dispatcher = dispatcher.start();

    // The router owns the only senders; serving to completion drops them
    run_server(create_app(state), addr).await?;

    if let Err(e) = dispatcher.await {
        tracing::error!(error = %e, "Event dispatcher task failed");
    }
    let closed = registry.close_all_sessions(Utc::now()).await;
    tracing::info!(
        closed,
        lost_increments = registry.lost_increments(),
        "Gateway stopped"
    );

    Ok(())
}
