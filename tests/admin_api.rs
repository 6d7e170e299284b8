//! Admin API: authentication, introspection and reload.

use std::io::Write;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use inmo_gateway::admin::setup_admin_router;
use inmo_gateway::config::ConfigSource;
use inmo_gateway::AppState;
use serde_json::json;

mod common;
use common::{config_with, send, start_backend, Reply};

const KEY: &str = "test-admin-key";

fn admin(method: Method, uri: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {key}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn toml_with_caja(url: &str) -> String {
    format!(
        "[admin]\nenabled = true\napi_key = \"{KEY}\"\n\n[services.endpoints]\ncaja = \"{url}\"\n"
    )
}

#[tokio::test]
async fn test_admin_requires_bearer_key() {
    let mut config = config_with(&[], &[]);
    config.admin.api_key = KEY.to_string();
    let state = AppState::new(config, ConfigSource::default()).unwrap();
    let router = setup_admin_router(state);

    let (status, _, _) = send(&router, admin(Method::GET, "/admin/status", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&router, admin(Method::GET, "/admin/status", Some("wrong"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = send(&router, admin(Method::GET, "/admin/status", Some(KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json(&body)["status"], "operational");
}

#[tokio::test]
async fn test_services_lists_configured_and_missing_keys() {
    let mut config = config_with(
        &[("caja", "http://caja.internal:4001")],
        &[("estado_caja_abierta", "http://caja.internal:4001/estados/1")],
    );
    config.admin.api_key = KEY.to_string();
    let state = AppState::new(config, ConfigSource::default()).unwrap();
    let router = setup_admin_router(state);

    let (_, _, body) = send(&router, admin(Method::GET, "/admin/services", Some(KEY))).await;
    let rows = common::json(&body);
    let rows = rows.as_array().unwrap();

    let caja = rows.iter().find(|r| r["key"] == "caja").unwrap();
    assert_eq!(caja["kind"], "service");
    assert_eq!(caja["url"], "http://caja.internal:4001");

    let ventas = rows.iter().find(|r| r["key"] == "ventas").unwrap();
    assert!(ventas["url"].is_null());

    let lookup = rows.iter().find(|r| r["key"] == "estado_caja_abierta").unwrap();
    assert_eq!(lookup["kind"], "lookup");
}

#[tokio::test]
async fn test_reload_swaps_routing_table() {
    let old = start_backend(Reply::json(200, json!({ "from": "old" }))).await;
    let new = start_backend(Reply::json(200, json!({ "from": "new" }))).await;

    let file = config_file(&toml_with_caja(&old.url()));
    let source = ConfigSource::new(Some(file.path().to_path_buf()), None);
    let state = AppState::new(source.load().unwrap(), source).unwrap();
    let gateway = inmo_gateway::http::build_router(state.clone(), 60);
    let admin_router = setup_admin_router(state.clone());

    let proxy = || admin(Method::GET, "/api/proxy?service=caja&path=cajas", None);
    let (_, _, body) = send(&gateway, proxy()).await;
    assert_eq!(common::json(&body)["from"], "old");

    std::fs::write(file.path(), toml_with_caja(&new.url())).unwrap();
    let (status, _, body) = send(&admin_router, admin(Method::POST, "/admin/reload", Some(KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json(&body)["status"], "reloaded");

    let (_, _, body) = send(&gateway, proxy()).await;
    assert_eq!(common::json(&body)["from"], "new");
    assert_eq!(old.call_count(), 1);
    assert_eq!(new.call_count(), 1);
}

#[tokio::test]
async fn test_rejected_reload_keeps_current_config() {
    let backend = start_backend(Reply::json(200, json!({}))).await;
    let file = config_file(&toml_with_caja(&backend.url()));
    let source = ConfigSource::new(Some(file.path().to_path_buf()), None);
    let state = AppState::new(source.load().unwrap(), source).unwrap();
    let admin_router = setup_admin_router(state.clone());

    std::fs::write(
        file.path(),
        format!("[admin]\napi_key = \"{KEY}\"\n[services.endpoints]\ncaja = \"ftp://nope\"\n"),
    )
    .unwrap();
    let (status, _, body) = send(&admin_router, admin(Method::POST, "/admin/reload", Some(KEY))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(common::json(&body)["error"].is_string());
    assert_eq!(
        state.snapshot().table.base_url("caja").unwrap(),
        backend.url().as_str()
    );
}

#[tokio::test]
async fn test_cache_inspect_and_clear() {
    let backend = start_backend(Reply::json(200, json!([{ "id": 1 }]))).await;
    let mut config = config_with(&[("caja", &backend.url())], &[]);
    config.admin.api_key = KEY.to_string();
    let (gateway, state) = common::gateway(config);
    let admin_router = setup_admin_router(state);

    let list = || admin(Method::GET, "/api/catalogs/tipos-pago", None);
    send(&gateway, list()).await;

    let (_, _, body) = send(&admin_router, admin(Method::GET, "/admin/cache", Some(KEY))).await;
    assert_eq!(common::json(&body)["entries"], 1);

    let (_, _, body) = send(&admin_router, admin(Method::DELETE, "/admin/cache", Some(KEY))).await;
    assert_eq!(common::json(&body)["cleared"], 1);

    send(&gateway, list()).await;
    assert_eq!(backend.call_count(), 2);
}
