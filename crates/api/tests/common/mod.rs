#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tower::ServiceExt;

use sweep_api::auth::password::hash_password;
use sweep_api::auth::session::{SessionAuthority, SessionConfig};
use sweep_api::config::{ServerConfig, TelegramConfig};
use sweep_api::router::build_app_router;
use sweep_api::state::AppState;
use sweep_core::slug::slugify;
use sweep_db::models::admin_user::{AdminUser, CreateAdminUser};
use sweep_db::models::app_setting::UpdateAppSettings;
use sweep_db::models::restaurant::Restaurant;
use sweep_db::repositories::{AdminUserRepo, AppSettingRepo, RestaurantRepo};
use sweep_telegram::{BotConfig, Notifier, NotifyError, TelegramError};

pub const TEST_SESSION_SECRET: &str = "integration-test-session-secret";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and no Telegram bot.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        session: SessionConfig {
            secret: TEST_SESSION_SECRET.to_string(),
            ttl_days: 7,
        },
        site_url: "http://localhost:5173".to_string(),
        telegram: TelegramConfig::default(),
        login_token_purge_interval_secs: 600,
        bootstrap_admin: None,
    }
}

/// A bot pointed at a closed local port: every Bot API call fails fast.
pub fn unreachable_bot() -> BotConfig {
    BotConfig {
        token: "123:test".to_string(),
        api_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(1),
    }
}

pub fn test_state(pool: PgPool, config: ServerConfig) -> AppState {
    AppState::new(pool, config).expect("state should build")
}

/// Build the router through the same builder production uses.
pub fn build_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    build_app_router(state, &config)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_app(test_state(pool, test_config()))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(
    method: Method,
    uri: &str,
    body: &serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

/// GET with arbitrary headers.
pub async fn get_with_headers(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::empty()).expect("request should build")).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PUT, uri, &body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

/// POST a raw body with arbitrary headers.
pub async fn post_raw(app: Router, uri: &str, body: &str, headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const TEST_PASSWORD: &str = "test_password_123";

pub async fn create_admin(pool: &PgPool, username: &str) -> AdminUser {
    let input = CreateAdminUser {
        username: username.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    AdminUserRepo::create(pool, &input)
        .await
        .expect("admin creation should succeed")
}

/// A valid session token for `admin_id`, signed with the test secret.
pub fn token_for(admin_id: i64) -> String {
    SessionAuthority::new(&test_config().session)
        .issue(admin_id)
        .encode()
}

pub async fn create_restaurant(pool: &PgPool, name: &str) -> Restaurant {
    RestaurantRepo::create_with_unique_slug(pool, name, &slugify(name))
        .await
        .expect("restaurant creation should succeed")
}

pub async fn enable_notifications(pool: &PgPool, chat_id: &str) {
    AppSettingRepo::update(
        pool,
        &UpdateAppSettings {
            telegram_chat_id: Some(chat_id.to_string()),
            telegram_notifications_enabled: Some(true),
        },
    )
    .await
    .expect("settings update should succeed");
}

// ---------------------------------------------------------------------------
// Notifier fakes
// ---------------------------------------------------------------------------

/// Forwards every notification to a channel.
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<(String, String)>,
}

impl RecordingNotifier {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<(String, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        let _ = self.tx.send((destination.to_string(), text.to_string()));
        Ok(())
    }
}

/// Records the attempt, then fails like a rejecting Bot API.
pub struct FailingNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl FailingNotifier {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, destination: &str, _text: &str) -> Result<(), NotifyError> {
        let _ = self.tx.send(destination.to_string());
        Err(NotifyError::Telegram(TelegramError::Api {
            code: 403,
            description: "Forbidden: bot was kicked from the group chat".into(),
        }))
    }
}

/// Wait up to two seconds for the next message on `rx`.
pub async fn next_within<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Option<T> {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .ok()
        .flatten()
}
