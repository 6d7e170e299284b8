use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;

use crate::catalog::CacheSummary;
use crate::routing::table::TableEntry;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub configured_services: usize,
    pub cached_pages: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let snapshot = state.snapshot();
    let ttl = Duration::from_secs(snapshot.config.cache.catalog_ttl_secs);
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.uptime_secs(),
        configured_services: snapshot.table.configured_count(),
        cached_pages: state.catalogs.cache().summary(ttl).entries,
    })
}

pub async fn get_services(State(state): State<AppState>) -> Json<Vec<TableEntry>> {
    Json(state.snapshot().table.entries())
}

pub async fn reload_config(State(state): State<AppState>) -> impl IntoResponse {
    match state.reload() {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "status": "reloaded",
                "configured_services": snapshot.table.configured_count(),
            })),
        ),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

pub async fn get_cache(State(state): State<AppState>) -> Json<CacheSummary> {
    let ttl = Duration::from_secs(state.snapshot().config.cache.catalog_ttl_secs);
    Json(state.catalogs.cache().summary(ttl))
}

pub async fn clear_cache(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cleared = state.catalogs.cache().clear();
    tracing::info!(cleared, "Catalog cache cleared");
    Json(json!({ "cleared": cleared }))
}
