//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Bind server to listener
//! - Apply configuration updates while running
//! - Run the admin API on its own listener

use std::time::Duration;

use axum::{
    middleware,
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::{ConfigSource, GatewayConfig};
use crate::http::catalog::{create_entry, delete_entry, get_entry, list_catalog, update_entry};
use crate::http::cors::cors_middleware;
use crate::http::proxy::proxy_handler;
use crate::state::AppState;

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    state: AppState,
}

impl GatewayServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig, source: ConfigSource) -> Result<Self, reqwest::Error> {
        let request_secs = config.timeouts.request_secs;
        let state = AppState::new(config, source)?;
        let router = build_router(state.clone(), request_secs);
        Ok(Self { router, state })
    }

    /// Shared state, for the admin API and tests.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations arriving on `config_updates` (from the file watcher)
    /// are applied as they come.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let updates_state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                updates_state.apply(config);
            }
        });

        let admin_config = self.state.snapshot().config.admin.clone();
        if admin_config.enabled {
            let admin_listener = TcpListener::bind(&admin_config.bind_address).await?;
            tracing::info!(address = %admin_listener.local_addr()?, "Admin API starting");
            let admin_router = admin::setup_admin_router(self.state.clone());
            let mut admin_shutdown = shutdown.resubscribe();
            tokio::spawn(async move {
                let result = axum::serve(admin_listener, admin_router)
                    .with_graceful_shutdown(async move {
                        let _ = admin_shutdown.recv().await;
                    })
                    .await;
                if let Err(e) = result {
                    tracing::error!(error = %e, "Admin API stopped with error");
                }
            });
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the gateway router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_secs: u64) -> Router {
    let api = Router::new()
        .route("/api/proxy", any(proxy_handler))
        .route("/api/catalogs/{kind}", get(list_catalog).post(create_entry))
        .route(
            "/api/catalogs/{kind}/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .layer(middleware::from_fn(cors_middleware));

    Router::new()
        .merge(api)
        .route("/healthz", get(|| async { Json(json!({ "status": "ok" })) }))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(request_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
