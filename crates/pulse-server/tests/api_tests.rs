//! Integration tests for the Pulse HTTP endpoints.
//!
//! Requests go through the Axum `Router` via `tower::ServiceExt`
//! without binding the server itself. Proxy tests point the upstream
//! client at a throwaway Axum app on an ephemeral localhost port.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use pulse_core::UpstreamConfig;
use pulse_server::router::build_router;
use pulse_server::state::AppState;
use pulse_server::upstream::UpstreamClient;
use pulse_types::Platform;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

// =========================================================================
// Fake upstream
// =========================================================================

#[derive(Clone, Default)]
struct Upstream {
    hits: Arc<AtomicUsize>,
    last_platform: Arc<Mutex<Option<String>>>,
}

impl Upstream {
    fn record(&self, params: &HashMap<String, String>) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        *self.last_platform.lock().unwrap() = params.get("platform").cloned();
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn ok_handler(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    upstream.record(&params);
    axum::Json(serde_json::json!({ "ok": true }))
}

async fn unavailable_handler(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    upstream.record(&params);
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn slow_handler(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    upstream.record(&params);
    tokio::time::sleep(Duration::from_secs(5)).await;
    axum::Json(serde_json::json!({ "late": true }))
}

/// Upstream body whose key order and number formatting a re-encode would change.
const ORDERED_BODY: &str = r#"{"zeta":1,"alpha":2.50,"posts":[]}"#;

async fn ordered_handler(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    upstream.record(&params);
    ([(header::CONTENT_TYPE, "application/json")], ORDERED_BODY)
}

async fn not_json_handler(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    upstream.record(&params);
    "<html>nope</html>"
}

async fn spawn_upstream<H, T>(handler: H) -> (SocketAddr, Upstream)
where
    H: axum::handler::Handler<T, Upstream>,
    T: 'static,
{
    let upstream = Upstream::default();
    let app = Router::new()
        .route("/post/list/", get(handler))
        .with_state(upstream.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, upstream)
}

fn state_for(base_url: String, timeout_ms: u64) -> Arc<AppState> {
    let upstream = UpstreamClient::new(&UpstreamConfig {
        base_url,
        timeout_ms,
    })
    .unwrap();
    Arc::new(AppState::new(upstream))
}

fn offline_state() -> Arc<AppState> {
    // Port 9 (discard) is never contacted by tests using this state.
    state_for(String::from("http://127.0.0.1:9"), 1_000)
}

async fn get_raw(router: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, bytes.to_vec())
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, bytes) = get_raw(router, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =========================================================================
// Proxy endpoint
// =========================================================================

#[tokio::test]
async fn test_missing_platform_is_bad_request_without_upstream_call() {
    let (addr, upstream) = spawn_upstream(ok_handler).await;
    let router = build_router(state_for(format!("http://{addr}"), 1_000));

    let (status, json) = get_json(router, "/post/list/").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, serde_json::json!({ "error": "platform is required" }));
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_empty_platform_is_bad_request() {
    let (addr, upstream) = spawn_upstream(ok_handler).await;
    let router = build_router(state_for(format!("http://{addr}"), 1_000));

    let (status, json) = get_json(router, "/post/list/?platform=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_upstream_body_is_relayed_unchanged() {
    let (addr, upstream) = spawn_upstream(ok_handler).await;
    let router = build_router(state_for(format!("http://{addr}"), 1_000));

    let (status, json) = get_json(router, "/post/list/?platform=X").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "ok": true }));
    assert_eq!(upstream.hits(), 1);
    assert_eq!(upstream.last_platform.lock().unwrap().as_deref(), Some("X"));
}

#[tokio::test]
async fn test_upstream_bytes_are_relayed_without_reencoding() {
    let (addr, _upstream) = spawn_upstream(ordered_handler).await;
    let router = build_router(state_for(format!("http://{addr}"), 1_000));

    let (status, content_type, body) = get_raw(router, "/post/list/?platform=F").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, ORDERED_BODY.as_bytes());
}

#[tokio::test]
async fn test_repeated_platform_proxies_first_value() {
    let (addr, upstream) = spawn_upstream(ok_handler).await;
    let router = build_router(state_for(format!("http://{addr}"), 1_000));

    let (status, json) = get_json(router, "/post/list/?platform=F&platform=I").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "ok": true }));
    assert_eq!(upstream.hits(), 1);
    assert_eq!(upstream.last_platform.lock().unwrap().as_deref(), Some("F"));
}

#[tokio::test]
async fn test_empty_first_platform_is_missing_even_if_repeated() {
    let (addr, upstream) = spawn_upstream(ok_handler).await;
    let router = build_router(state_for(format!("http://{addr}"), 1_000));

    let (status, content_type, body) = get_raw(router, "/post/list/?platform=&platform=X").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "error": "platform is required" }));
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_route_without_trailing_slash_also_proxies() {
    let (addr, upstream) = spawn_upstream(ok_handler).await;
    let router = build_router(state_for(format!("http://{addr}/"), 1_000));

    let (status, _) = get_json(router, "/post/list?platform=F").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_upstream_error_status_is_server_error() {
    let (addr, upstream) = spawn_upstream(unavailable_handler).await;
    let router = build_router(state_for(format!("http://{addr}"), 1_000));

    let (status, json) = get_json(router, "/post/list/?platform=I").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("503"), "unexpected message: {message}");
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_upstream_timeout_is_server_error() {
    let (addr, _upstream) = spawn_upstream(slow_handler).await;
    let router = build_router(state_for(format!("http://{addr}"), 200));

    let (status, json) = get_json(router, "/post/list/?platform=Y").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("timed out"), "unexpected message: {message}");
}

#[tokio::test]
async fn test_non_json_upstream_body_is_server_error() {
    let (addr, _upstream) = spawn_upstream(not_json_handler).await;
    let router = build_router(state_for(format!("http://{addr}"), 1_000));

    let (status, json) = get_json(router, "/post/list/?platform=T").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_unreachable_upstream_is_server_error() {
    // Grab a free port, then close it so the connection is refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let router = build_router(state_for(format!("http://{addr}"), 1_000));
    let (status, json) = get_json(router, "/post/list/?platform=F").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].is_string());
}

// =========================================================================
// Mock data and metadata endpoints
// =========================================================================

#[tokio::test]
async fn test_mock_single_day_has_one_or_two_posts_per_platform() {
    let router = build_router(offline_state());

    let (status, json) =
        get_json(router, "/post/mock/?start_date=2024-05-01&end_date=2024-05-01").await;

    assert_eq!(status, StatusCode::OK);
    for platform in Platform::ALL {
        let posts = json[platform.code()]["posts"].as_array().unwrap();
        assert!((1..=2).contains(&posts.len()), "{platform}: {}", posts.len());
        for post in posts {
            assert!(post["_id"].as_str().unwrap().contains("20240501"));
            let r = &post["reactions"];
            let sum: u64 = ["Like", "Love", "Sad", "Haha", "Wow", "Angry", "Care"]
                .iter()
                .map(|k| r[*k].as_u64().unwrap())
                .sum();
            assert_eq!(r["Total"].as_u64().unwrap(), sum);
        }
    }
}

#[tokio::test]
async fn test_mock_reversed_range_is_empty_for_every_platform() {
    let router = build_router(offline_state());

    let (status, json) =
        get_json(router, "/post/mock/?start_date=2024-05-02&end_date=2024-05-01").await;

    assert_eq!(status, StatusCode::OK);
    for platform in Platform::ALL {
        let posts = json[platform.code()]["posts"].as_array().unwrap();
        assert!(posts.is_empty());
    }
}

#[tokio::test]
async fn test_mock_default_range_covers_every_platform() {
    let router = build_router(offline_state());

    let (status, json) = get_json(router, "/post/mock/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_object().unwrap().len(), Platform::ALL.len());
}

#[tokio::test]
async fn test_mock_invalid_date_is_bad_request() {
    let router = build_router(offline_state());

    let (status, json) = get_json(router, "/post/mock/?start_date=yesterday").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("start_date"));
}

#[tokio::test]
async fn test_mock_repeated_dates_use_first_values() {
    let router = build_router(offline_state());

    let (status, json) = get_json(
        router,
        "/post/mock/?start_date=2024-05-01&start_date=1999-01-01\
         &end_date=2024-05-01&end_date=2030-01-01",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    for platform in Platform::ALL {
        let posts = json[platform.code()]["posts"].as_array().unwrap();
        assert!((1..=2).contains(&posts.len()), "{platform}: {}", posts.len());
    }
}

#[tokio::test]
async fn test_mock_oversized_range_is_bad_request() {
    let router = build_router(offline_state());

    let (status, _) =
        get_json(router, "/post/mock/?start_date=2000-01-01&end_date=2024-01-01").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_platforms_lists_all_codes() {
    let router = build_router(offline_state());

    let (status, json) = get_json(router, "/platforms/").await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0], serde_json::json!({ "code": "F", "name": "Facebook" }));
    assert_eq!(entries[3], serde_json::json!({ "code": "Y", "name": "YouTube" }));
}

#[tokio::test]
async fn test_health() {
    let router = build_router(offline_state());

    let (status, json) = get_json(router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let router = build_router(offline_state());

    let response = router
        .oneshot(
            Request::get("/health")
                .header("origin", "http://dashboard.local")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let allow = response
        .headers()
        .get("access-control-allow-origin")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(allow, "*");
}
