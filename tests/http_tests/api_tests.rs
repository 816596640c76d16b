//! Tests for the HTTP API
//!
//! These tests verify:
//! - Routes, status codes and JSON bodies for every endpoint
//! - Page translation and query parameter validation
//! - Error bodies for bad patterns, bodies and missing keys
//! - Server shutdown closes the store

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use stratakv::http::Server;
use stratakv::{Config, StorageFacade};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_app() -> (TempDir, Arc<StorageFacade>, Router) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    let store = Arc::new(StorageFacade::open(&config).unwrap());
    let router = Server::new(config, Arc::clone(&store)).router();
    (temp_dir, store, router)
}

/// Same as `setup_temp_app`, with key10..key29 / val10..val29 inserted
fn setup_populated_app() -> (TempDir, Arc<StorageFacade>, Router) {
    let (temp, store, router) = setup_temp_app();
    for i in 10..30 {
        store
            .set(format!("key{}", i).as_bytes(), format!("val{}", i).as_bytes())
            .unwrap();
    }
    (temp, store, router)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<Value>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<Value>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_json(app: &Router, body: &str) -> (StatusCode, Option<Value>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/items/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post_raw(
    app: &Router,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Option<Value>) {
    let mut builder = Request::builder().method(Method::POST).uri("/api/items/");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Option<Value>) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn data_keys(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["key"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// List Tests
// =============================================================================

#[tokio::test]
async fn test_list_defaults_to_first_page_of_ten() {
    let (_temp, _store, app) = setup_populated_app();

    let (status, body) = get(&app, "/api/items/").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"][0], json!({"key": "key10", "value": "val10"}));
    assert_eq!(body["data"][9], json!({"key": "key19", "value": "val19"}));
}

#[tokio::test]
async fn test_list_with_search_and_page() {
    let (_temp, _store, app) = setup_populated_app();

    let (status, body) = get(&app, "/api/items/?search=key2&page=2&page_size=3").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 10);
    assert_eq!(data_keys(&body), vec!["key23", "key24", "key25"]);
}

#[tokio::test]
async fn test_list_page_size_zero_counts_only() {
    let (_temp, _store, app) = setup_populated_app();

    let (status, body) = get(&app, "/api/items/?page_size=0").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_list_page_past_end_is_empty() {
    let (_temp, _store, app) = setup_populated_app();

    let (status, body) = get(&app, "/api/items/?page=5&page_size=10").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_list_encoded_regex() {
    let (_temp, _store, app) = setup_populated_app();

    // search=^key1[5-7]$
    let (status, body) = get(&app, "/api/items/?search=%5Ekey1%5B5-7%5D%24&page_size=10").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(data_keys(&body), vec!["key15", "key16", "key17"]);
}

#[tokio::test]
async fn test_list_invalid_pattern_is_bad_request() {
    let (_temp, _store, app) = setup_populated_app();

    let (status, body) = get(&app, "/api/items/?search=key%5B").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.unwrap()["error"].as_str().unwrap().contains("Invalid pattern"));
}

#[tokio::test]
async fn test_list_page_zero_is_bad_request() {
    let (_temp, _store, app) = setup_populated_app();

    let (status, body) = get(&app, "/api/items/?page=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.unwrap()["error"].is_string());
}

#[tokio::test]
async fn test_list_empty_page_params_use_defaults() {
    let (_temp, _store, app) = setup_populated_app();

    let (status, body) = get(&app, "/api/items/?search=&page=&page_size=").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"][0]["key"], "key10");
}

#[tokio::test]
async fn test_list_past_deadline_is_server_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .request_timeout_ms(1)
        .build();
    let store = Arc::new(StorageFacade::open(&config).unwrap());

    // Large values make each visited entry expensive to copy out
    let value = vec![b'v'; 256 * 1024];
    for i in 0..200 {
        store.set(format!("key{:03}", i).as_bytes(), &value).unwrap();
    }
    let app = Server::new(config, Arc::clone(&store)).router();

    let (status, body) = get(&app, "/api/items/?page_size=1000").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Scan deadline exceeded");
    assert!(body.get("total").is_none());
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_list_non_numeric_page_is_bad_request() {
    let (_temp, _store, app) = setup_populated_app();

    for uri in ["/api/items/?page=abc", "/api/items/?page_size=-1"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body.unwrap()["error"].is_string());
    }
}

// =============================================================================
// Get / Set / Delete Tests
// =============================================================================

#[tokio::test]
async fn test_set_then_get() {
    let (_temp, _store, app) = setup_temp_app();

    let (status, body) = post_json(&app, r#"{"key": "greeting", "value": "hello"}"#).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());

    let (status, body) = get(&app, "/api/items/greeting/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), json!({"key": "greeting", "value": "hello"}));
}

#[tokio::test]
async fn test_set_decodes_json_regardless_of_content_type() {
    let (_temp, store, app) = setup_temp_app();

    let cases = [
        (None, "plain"),
        (Some("application/x-www-form-urlencoded"), "form"),
        (Some("text/plain"), "text"),
    ];

    for (content_type, key) in cases {
        let raw = format!(r#"{{"key": "{}", "value": "v-{}"}}"#, key, key);
        let (status, body) = post_raw(&app, content_type, &raw).await;
        assert_eq!(status, StatusCode::NO_CONTENT, "{:?}", content_type);
        assert!(body.is_none());
        assert_eq!(store.get(key.as_bytes()).unwrap(), format!("v-{}", key).into_bytes());
    }
}

#[tokio::test]
async fn test_set_overwrites() {
    let (_temp, store, app) = setup_temp_app();

    post_json(&app, r#"{"key": "k", "value": "one"}"#).await;
    post_json(&app, r#"{"key": "k", "value": "two"}"#).await;

    assert_eq!(store.get(b"k").unwrap(), b"two".to_vec());
}

#[tokio::test]
async fn test_get_percent_encoded_key() {
    let (_temp, store, app) = setup_temp_app();
    store.set(b"hello world", b"spaced").unwrap();

    let (status, body) = get(&app, "/api/items/hello%20world/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["value"], "spaced");
}

#[tokio::test]
async fn test_get_missing_key_is_not_found() {
    let (_temp, _store, app) = setup_temp_app();

    let (status, body) = get(&app, "/api/items/missing/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"], "Key not found");
}

#[tokio::test]
async fn test_set_rejects_bad_bodies() {
    let (_temp, store, app) = setup_temp_app();

    let bodies = [
        r#"{"key": "only-key"}"#,
        r#"{"value": "only-value"}"#,
        r#"{"key": "", "value": "v"}"#,
        r#"{"key": "k", "value": ""}"#,
        r#"{"key": 1, "value": "v"}"#,
        "not json",
    ];

    for raw in bodies {
        let (status, body) = post_json(&app, raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", raw);
        assert!(body.unwrap()["error"].is_string(), "{}", raw);
    }

    assert_eq!(store.scan_all().unwrap().len().unwrap(), 0);
}

#[tokio::test]
async fn test_delete_existing_and_absent() {
    let (_temp, store, app) = setup_populated_app();

    let (status, body) = delete(&app, "/api/items/key10/").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());

    // Absent key is still a success
    let (status, _) = delete(&app, "/api/items/key10/").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert!(store.get(b"key10").is_err());
    let (_, body) = get(&app, "/api/items/?page_size=0").await;
    assert_eq!(body.unwrap()["total"], 19);
}

#[tokio::test]
async fn test_closed_store_is_server_error() {
    let (_temp, store, app) = setup_populated_app();
    store.close();

    let (status, body) = get(&app, "/api/items/key10/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.unwrap()["error"], "Store is closed");

    let (status, _) = get(&app, "/api/items/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (_temp, _store, app) = setup_temp_app();

    let (status, _) = get(&app, "/api/other/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_serve_closes_store_on_shutdown() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .listen_addr("127.0.0.1:0")
        .shutdown_timeout_ms(1000)
        .build();
    let store = Arc::new(StorageFacade::open(&config).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let server = Server::new(config, Arc::clone(&store));
    server.serve(listener, async {}).await.unwrap();

    assert!(store.is_closed());
}
