use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{CatalogKind, Paginated};
use crate::error::Result;
use crate::http::request::forwardable_headers;
use crate::state::AppState;

const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<u32>,
    #[serde(alias = "limit")]
    pub per_page: Option<u32>,
}

pub async fn list_catalog(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<PageParams>,
    headers: HeaderMap,
) -> Result<Json<Paginated<Value>>> {
    let kind: CatalogKind = kind.parse()?;
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);

    let snapshot = state.snapshot();
    let page = state
        .catalogs
        .list(&snapshot, kind, page, per_page, &forwardable_headers(&headers))
        .await;
    Ok(Json(page))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let kind: CatalogKind = kind.parse()?;
    let snapshot = state.snapshot();
    let entry = state
        .catalogs
        .get(&snapshot, kind, &id, &forwardable_headers(&headers))
        .await?;
    Ok(Json(entry))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let kind: CatalogKind = kind.parse()?;
    let snapshot = state.snapshot();
    let created = state
        .catalogs
        .create(&snapshot, kind, &body, &forwardable_headers(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let kind: CatalogKind = kind.parse()?;
    let snapshot = state.snapshot();
    let updated = state
        .catalogs
        .update(&snapshot, kind, &id, &body, &forwardable_headers(&headers))
        .await?;
    Ok(Json(updated))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    let kind: CatalogKind = kind.parse()?;
    let snapshot = state.snapshot();
    let deleted = state
        .catalogs
        .delete(&snapshot, kind, &id, &forwardable_headers(&headers))
        .await?;
    Ok(Json(deleted))
}
