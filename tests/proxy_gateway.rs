//! End-to-end behavior of `/api/proxy` against mock downstream services.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;

mod common;
use common::{config_with, gateway, send, start_backend, start_programmable_backend, Reply};

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_missing_service_is_rejected_without_outbound_call() {
    let backend = start_backend(Reply::json(200, json!({ "ok": true }))).await;
    let (router, _) = gateway(config_with(&[("caja", &backend.url())], &[]));

    let (status, _, body) = send(&router, request(Method::GET, "/api/proxy?path=cajas")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(common::json(&body)["error"].is_string());
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_unconfigured_and_unknown_services_are_rejected() {
    let backend = start_backend(Reply::json(200, json!({}))).await;
    let (router, _) = gateway(config_with(&[("caja", &backend.url())], &[]));

    for uri in [
        "/api/proxy?service=ventas&path=ventas",
        "/api/proxy?service=no-such-service",
        "/api/proxy?service=",
        "/api/proxy?service=estado_caja_abierta",
    ] {
        let (status, _, body) = send(&router, request(Method::POST, uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(common::json(&body)["error"].is_string(), "{uri}");
    }
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_options_preflight_never_reaches_downstream() {
    let backend = start_backend(Reply::json(200, json!({}))).await;
    let (router, _) = gateway(config_with(&[("inmobiliaria", &backend.url())], &[]));

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/proxy?service=inmobiliaria&path=propiedades")
        .header(header::ORIGIN, "http://backoffice.local")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&router, req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://backoffice.local"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_options_preflight_without_service_is_still_ok() {
    let (router, _) = gateway(config_with(&[], &[]));
    let (status, _, body) = send(&router, request(Method::OPTIONS, "/api/proxy")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_lookup_always_issues_get() {
    let backend = start_backend(Reply::json(200, json!({ "id": 3 }))).await;
    let lookup_url = format!("{}/estados-caja/abierta", backend.url());
    let (router, _) = gateway(config_with(&[], &[("estado_caja_abierta", &lookup_url)]));

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/proxy?service=estado_caja_abierta&path=ignored&page=9")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"x":1}"#))
        .unwrap();
    let (status, _, body) = send(&router, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json(&body), json!({ "id": 3 }));

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].uri, "/estados-caja/abierta");
    assert!(calls[0].body.is_empty());
}

#[tokio::test]
async fn test_lookup_non_success_becomes_500_with_details() {
    let backend = start_backend(Reply::json(404, json!({ "message": "not found" }))).await;
    let (router, _) = gateway(config_with(&[], &[("tipo_pago_efectivo", &backend.url())]));

    let (status, _, body) = send(
        &router,
        request(Method::DELETE, "/api/proxy?service=tipo_pago_efectivo"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = common::json(&body);
    assert!(body["error"].is_string());
    assert_eq!(body["details"]["status"], 404);
    assert_eq!(body["details"]["body"]["message"], "not found");
    assert_eq!(backend.calls()[0].method, Method::GET);
}

#[tokio::test]
async fn test_lookup_plain_text_is_passed_through() {
    let backend = start_backend(Reply::text(200, "42")).await;
    let (router, _) = gateway(config_with(&[], &[("estado_caja_cerrada", &backend.url())]));

    let (status, _, body) = send(
        &router,
        request(Method::GET, "/api/proxy?service=estado_caja_cerrada"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"42");
}

#[tokio::test]
async fn test_lookup_transport_failure_is_500() {
    let down = common::unreachable_url().await;
    let (router, _) = gateway(config_with(&[], &[("estado_caja_abierta", &down)]));

    let (status, _, body) = send(
        &router,
        request(Method::GET, "/api/proxy?service=estado_caja_abierta"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = common::json(&body);
    assert!(body["error"].is_string());
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_target_url_reconstruction() {
    let backend = start_backend(Reply::json(200, json!({ "data": [] }))).await;
    let (router, _) = gateway(config_with(&[("inmobiliaria", &backend.url())], &[]));

    let (status, _, _) = send(
        &router,
        request(
            Method::GET,
            "/api/proxy?service=inmobiliaria&path=propiedades&page=2&limit=10",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let calls = backend.calls();
    assert_eq!(calls[0].uri, "/propiedades?page=2&limit=10");
}

#[tokio::test]
async fn test_numbered_path_segments_and_repeated_params() {
    let backend = start_backend(Reply::json(200, json!([]))).await;
    let (router, _) = gateway(config_with(&[("caja", &backend.url())], &[]));

    send(
        &router,
        request(
            Method::GET,
            "/api/proxy?service=caja&path1=movimientos&path0=cajas%2F7&estado=1&estado=2",
        ),
    )
    .await;

    assert_eq!(backend.calls()[0].uri, "/cajas/7/movimientos?estado=1&estado=2");
}

#[tokio::test]
async fn test_no_path_hits_bare_base_url() {
    let backend = start_backend(Reply::json(200, json!({}))).await;
    let (router, _) = gateway(config_with(&[("config", &backend.url())], &[]));

    send(&router, request(Method::GET, "/api/proxy?service=config&path=")).await;

    assert_eq!(backend.calls()[0].uri, "/");
}

#[tokio::test]
async fn test_raw_multipart_body_is_forwarded_verbatim() {
    let backend = start_backend(Reply::json(201, json!({ "stored": true }))).await;
    let (router, _) = gateway(config_with(&[("archivos", &backend.url())], &[]));

    let boundary = "----gatewayboundary";
    let mut payload = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"plano.bin\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    payload.extend_from_slice(&[0x00, 0xff, 0x10, 0x80, 0x7f, 0x00]);
    payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/proxy?service=archivos&path=upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(payload.clone()))
        .unwrap();
    let (status, _, body) = send(&router, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(common::json(&body)["stored"], true);

    let calls = backend.calls();
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].uri, "/upload");
    assert_eq!(&calls[0].body[..], &payload[..]);
    assert_eq!(
        calls[0].headers[header::CONTENT_TYPE],
        format!("multipart/form-data; boundary={boundary}").as_str()
    );
}

#[tokio::test]
async fn test_files_alias_shares_archivos_url() {
    let backend = start_backend(Reply::json(200, json!({}))).await;
    let (router, _) = gateway(config_with(&[("files", &backend.url())], &[]));

    let (status, _, _) = send(&router, request(Method::GET, "/api/proxy?service=files&path=x")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_downstream_error_status_is_relayed() {
    let backend = start_backend(Reply::json(422, json!({ "errors": ["nombre requerido"] }))).await;
    let (router, _) = gateway(config_with(&[("caja", &backend.url())], &[]));

    let req = Request::builder()
        .method(Method::PUT)
        .uri("/api/proxy?service=caja&path=tipos-pago/4")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"nombre":""}"#))
        .unwrap();
    let (status, _, body) = send(&router, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(common::json(&body)["errors"][0], "nombre requerido");
    assert_eq!(&backend.calls()[0].body[..], br#"{"nombre":""}"#);
}

#[tokio::test]
async fn test_non_json_body_is_relayed_as_text() {
    let backend = start_backend(Reply::text(503, "maintenance")).await;
    let (router, _) = gateway(config_with(&[("ventas", &backend.url())], &[]));

    let (status, headers, body) =
        send(&router, request(Method::GET, "/api/proxy?service=ventas&path=ventas")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body[..], b"maintenance");
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_transport_failure_is_500_with_details() {
    let down = common::unreachable_url().await;
    let (router, _) = gateway(config_with(&[("atencion", &down)], &[]));

    let (status, _, body) =
        send(&router, request(Method::GET, "/api/proxy?service=atencion&path=tickets")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = common::json(&body);
    assert!(body["error"].is_string());
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_request_id_and_credentials_are_forwarded() {
    let backend = start_backend(Reply::json(200, json!({}))).await;
    let (router, _) = gateway(config_with(&[("auth", &backend.url())], &[]));

    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/proxy?service=auth&path=auth/me")
        .header(header::AUTHORIZATION, "Bearer abc")
        .header(header::COOKIE, "session=1")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(&router, req).await;

    let call = &backend.calls()[0];
    assert_eq!(call.headers[header::AUTHORIZATION], "Bearer abc");
    assert_eq!(call.headers[header::COOKIE], "session=1");
    assert!(call.headers.contains_key("x-request-id"));
    assert_eq!(call.headers["x-request-id"], headers["x-request-id"]);
}

#[tokio::test]
async fn test_client_accept_encoding_is_not_forwarded() {
    let backend = start_programmable_backend(|req| {
        if req.headers.contains_key(header::ACCEPT_ENCODING) {
            Reply::gzip(200)
        } else {
            Reply::json(200, json!({ "cajas": [1, 2] }))
        }
    })
    .await;
    let (router, _) = gateway(config_with(&[("caja", &backend.url())], &[]));

    let req = Request::builder()
        .uri("/api/proxy?service=caja&path=cajas")
        .header(header::ACCEPT_ENCODING, "gzip, deflate, br")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&router, req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(header::CONTENT_ENCODING).is_none());
    assert_eq!(common::json(&body), json!({ "cajas": [1, 2] }));
    assert!(!backend.calls()[0].headers.contains_key(header::ACCEPT_ENCODING));
}

#[tokio::test]
async fn test_auth_login_and_logout_use_their_own_deadlines() {
    let backend = start_backend(Reply::json(200, json!({ "ok": true })).after(Duration::from_secs(2))).await;
    let mut config = config_with(&[("auth", &backend.url())], &[]);
    config.timeouts.upstream_secs = 30;
    config.timeouts.login_secs = 1;
    config.timeouts.logout_secs = 1;
    let (router, _) = gateway(config);

    for path in ["auth/login", "auth/logout"] {
        let started = Instant::now();
        let (status, _, body) = send(
            &router,
            request(Method::POST, &format!("/api/proxy?service=auth&path={path}")),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert!(common::json(&body)["details"]
            .as_str()
            .unwrap()
            .contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(2), "{path}");
    }

    // other auth calls keep the general upstream deadline
    let (status, _, _) = send(&router, request(Method::GET, "/api/proxy?service=auth&path=auth/me")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backend.call_count(), 3);
}
