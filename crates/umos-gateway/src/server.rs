// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the admin API.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use umos_collector::{
    ChannelService, CollectorRegistry, Dispatcher, OrderService, ProductService,
};
use umos_core::UmosError;
use umos_storage::Database;
use umos_vault::Vault;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub channels: ChannelService,
    pub products: ProductService,
    pub orders: OrderService,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    /// Wires the services over one database, vault, and registry.
    pub fn new(db: Arc<Database>, vault: Arc<Vault>, registry: CollectorRegistry) -> Self {
        let dispatcher = Dispatcher::new(db.clone(), vault.clone(), Arc::new(registry));
        Self {
            channels: ChannelService::new(db.clone(), vault),
            products: ProductService::new(db.clone(), dispatcher.clone()),
            orders: OrderService::new(db, dispatcher),
            start_time: Instant::now(),
        }
    }
}

/// Server bind configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the full route tree.
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/channels",
            post(handlers::create_channel).get(handlers::list_channels),
        )
        .route(
            "/channels/{id}",
            get(handlers::get_channel)
                .put(handlers::update_channel)
                .delete(handlers::delete_channel),
        )
        .route("/products/fetch-all", get(handlers::fetch_all_products))
        .route("/products/{channel_id}/fetch", get(handlers::fetch_products))
        .route("/orders", get(handlers::list_orders))
        .route(
            "/orders/channels/{channel_id}/fetch",
            post(handlers::fetch_orders),
        );

    Router::new()
        .route("/health", get(handlers::get_health))
        .nest("/api/v1/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds and serves the gateway until the process exits.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), UmosError> {
    let app = router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| UmosError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| UmosError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
