#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use keygate_core::notify::{NotificationSink, OriginChange};
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use keygate_api::config::{AuthConfig, ServerConfig, WebhookConfig};
use keygate_api::routes::app_routes;
use keygate_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "integration-test-jwt-secret";
pub const TEST_HASH_KEY: &str = "integration-test-hash-key";

/// Captures origin-change events instead of delivering them, so tests can
/// assert on what the rotation rules emitted.
#[derive(Default)]
pub struct CaptureSink {
    pub events: std::sync::Mutex<Vec<OriginChange>>,
}

impl NotificationSink for CaptureSink {
    fn notify(&self, change: OriginChange) {
        self.events.lock().unwrap().push(change);
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connect_attempts: 1,
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            refresh_hash_key: TEST_HASH_KEY.to_string(),
            access_token_ttl_mins: 15,
            refresh_session_ttl_hours: 24,
        },
        webhook: WebhookConfig {
            url: "http://127.0.0.1:1/webhook".to_string(),
            queue_capacity: 8,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a capturing notification sink.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack production uses.
pub fn build_test_app(pool: PgPool) -> (Router, Arc<CaptureSink>) {
    let sink = Arc::new(CaptureSink::default());
    let state = AppState::build(pool, test_config(), sink.clone());

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(app_routes())
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors);

    (app, sink)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Client identity presented with a request; maps to the headers the
/// extractors read.
#[derive(Debug, Clone)]
pub struct Client {
    pub device: &'static str,
    pub origin: &'static str,
}

pub const CLIENT_A: Client = Client {
    device: "test-agent/1.0",
    origin: "203.0.113.10",
};

pub const CLIENT_B: Client = Client {
    device: "other-agent/2.0",
    origin: "198.51.100.20",
};

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_as(app: Router, uri: &str, client: &Client) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("user-agent", client.device)
        .header("x-forwarded-for", client.origin)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    client: &Client,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header("user-agent", client.device)
        .header("x-forwarded-for", client.origin)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
