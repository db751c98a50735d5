//! Common Test Utilities for Integration Tests
//!
//! A stub DecentralBet backend served on an ephemeral port. Every route
//! answers 200 except the auth endpoints, whose behavior is configurable, and
//! `/socket.io/`, which upgrades to a WebSocket and sends an engine.io open
//! packet.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use dashmap::DashMap;
use goose::config::GooseConfiguration;
use gumdrop::Options;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub const STUB_TOKEN: &str = "stub-token";

const OPEN_PACKET: &str =
    r#"0{"sid":"stub-sid","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#;

/// How the stub answers the auth endpoints
#[derive(Debug, Clone, Copy)]
pub struct StubBehavior {
    /// Registration answers 400 "User already exists"
    pub reject_registration: bool,
    /// Login answers 401
    pub reject_login: bool,
}

impl StubBehavior {
    pub fn ok() -> Self {
        Self {
            reject_registration: false,
            reject_login: false,
        }
    }

    pub fn auth_rejected() -> Self {
        Self {
            reject_registration: true,
            reject_login: true,
        }
    }
}

#[derive(Default)]
struct StubState {
    behavior: Option<StubBehavior>,
    /// "METHOD /path" -> hits
    hits: DashMap<String, usize>,
    /// "METHOD /path" -> hits carrying the stub bearer token
    authorized: DashMap<String, usize>,
    /// Login email -> attempts
    logins: DashMap<String, usize>,
}

impl StubState {
    fn record(&self, method: &Method, uri: &Uri, headers: &HeaderMap) {
        let key = format!("{} {}", method, uri.path());
        *self.hits.entry(key.clone()).or_insert(0) += 1;

        let bearer = format!("Bearer {}", STUB_TOKEN);
        let authorized = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == bearer);
        if authorized {
            *self.authorized.entry(key).or_insert(0) += 1;
        }
    }

    fn record_login(&self, body: &[u8]) {
        let email = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|json| json["email"].as_str().map(str::to_string))
            .unwrap_or_default();
        *self.logins.entry(email).or_insert(0) += 1;
    }

    fn behavior(&self) -> StubBehavior {
        self.behavior.unwrap_or_else(StubBehavior::ok)
    }
}

async fn handle_http(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.record(&method, &uri, &headers);
    if method == Method::POST && uri.path() == "/api/v1/auth/login" {
        state.record_login(&body);
    }
    let behavior = state.behavior();

    match (method.as_str(), uri.path()) {
        ("POST", "/api/v1/auth/register") if behavior.reject_registration => (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "User already exists"})),
        )
            .into_response(),
        ("POST", "/api/v1/auth/register") => (
            StatusCode::CREATED,
            Json(json!({"success": true, "data": {"user": {"id": "stub-user"}}})),
        )
            .into_response(),
        ("POST", "/api/v1/auth/login") if behavior.reject_login => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "Invalid credentials"})),
        )
            .into_response(),
        ("POST", "/api/v1/auth/login") => Json(json!({
            "success": true,
            "data": {"user": {"id": "stub-user"}, "token": STUB_TOKEN}
        }))
        .into_response(),
        _ => Json(json!({"success": true, "data": Value::Null})).into_response(),
    }
}

async fn handle_socket_io(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    state.record(&method, &uri, &headers);
    ws.on_upgrade(open_transport)
}

async fn open_transport(mut socket: WebSocket) {
    if socket
        .send(Message::Text(OPEN_PACKET.to_string()))
        .await
        .is_err()
    {
        return;
    }
    while let Some(Ok(msg)) = socket.recv().await {
        if matches!(msg, Message::Close(_)) {
            break;
        }
    }
}

/// Stub backend running on a background task
pub struct StubServer {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubServer {
    pub async fn start(behavior: StubBehavior) -> Self {
        let state = Arc::new(StubState {
            behavior: Some(behavior),
            ..StubState::default()
        });

        let app = Router::new()
            .route("/socket.io/", get(handle_socket_io))
            .fallback(handle_http)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn host(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Hits for "METHOD /path"
    pub fn hits(&self, key: &str) -> usize {
        self.state.hits.get(key).map(|count| *count).unwrap_or(0)
    }

    /// Hits for "METHOD /path" that carried the stub token
    pub fn authorized_hits(&self, key: &str) -> usize {
        self.state.authorized.get(key).map(|count| *count).unwrap_or(0)
    }

    /// Login attempts made with `email`
    pub fn logins_for(&self, email: &str) -> usize {
        self.state.logins.get(email).map(|count| *count).unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.hits.iter().map(|entry| *entry.value()).sum()
    }

    pub fn total_authorized_hits(&self) -> usize {
        self.state.authorized.iter().map(|entry| *entry.value()).sum()
    }
}

/// Upper bound for a whole capped run against the stub
pub const RUN_DEADLINE: Duration = Duration::from_secs(60);

/// Goose configuration as if no command line flags were given
pub fn goose_config() -> GooseConfiguration {
    GooseConfiguration::parse_args_default(&[] as &[&str]).unwrap()
}
