//! HTTP routes
//!
//! Implements the wire contracts the client core depends on. The login
//! cookie and the bearer-token channel are issued side by side, but only
//! the bearer channel is consulted for authorization — the cookie exists
//! for wire compatibility with the original backend.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::SET_COOKIE};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use crate::metrics;
use crate::mint::mint_token;

/// Lifetime of issued bearer tokens.
const TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Login cookie lifetime: one week.
const COOKIE_MAX_AGE_SECS: u64 = 7 * 24 * 3600;

struct DemoAccount {
    username: &'static str,
    password: &'static str,
    id: i64,
    name: &'static str,
    role: &'static str,
    department: &'static str,
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        username: "admin",
        password: "admin123",
        id: 1,
        name: "Admin User",
        role: "Admin",
        department: "Admin",
    },
    DemoAccount {
        username: "mfloor",
        password: "floor123",
        id: 2,
        name: "Marta Floor",
        role: "Supervisor",
        department: "Production",
    },
];

/// Shared application state accessible from all handlers
#[derive(Clone)]
pub struct AppState {
    /// Bearer tokens this process has issued and still honors
    sessions: Arc<Mutex<HashSet<String>>>,
    production: bool,
    prometheus: PrometheusHandle,
}

impl AppState {
    pub fn new(production: bool, prometheus: PrometheusHandle) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashSet::new())),
            production,
            prometheus,
        }
    }

    fn issue(&self, token: String) {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token);
    }

    fn is_issued(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(token)
    }

    fn revoke(&self, token: &str) {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token);
    }
}

/// Hard expiry per the token's own `exp` claim. Unlike the client's
/// proactive check this applies no buffer; an undecodable payload counts
/// as expired.
fn is_past_exp(token: &str) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    match fabdash_session::expires_at(token) {
        Some(exp) => exp < now,
        None => true,
    }
}

/// Build the router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/api/orders", get(orders))
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: common::Secret<String>,
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}

/// Bearer token from the Authorization header, if any.
fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Login surface. Verifies the demo credentials, returns the user record
/// (password never echoed), and sets the http-only session cookie.
async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Response {
    let account = DEMO_ACCOUNTS.iter().find(|account| {
        account.username == request.username
            && account.password == request.password.expose().as_str()
    });

    let Some(account) = account else {
        metrics::record_login("failure");
        warn!(username = %request.username, "login rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid username or password"})),
        )
            .into_response();
    };

    let cookie_token = mint_token(account.id, account.username, TOKEN_TTL);
    state.issue(cookie_token.clone());

    let mut cookie = format!(
        "token={cookie_token}; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Strict"
    );
    if state.production {
        cookie.push_str("; Secure");
    }

    metrics::record_login("success");
    info!(username = %account.username, "login succeeded");

    (
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "user": {
                "id": account.id,
                "name": account.name,
                "role": account.role,
                "department": account.department,
            }
        })),
    )
        .into_response()
}

/// Token refresh endpoint. Any presented bearer token — including a stale
/// one — is exchanged for a fresh session record.
async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized("Not authenticated");
    }

    // Stub: every refresh re-issues the demo admin session
    let account = &DEMO_ACCOUNTS[0];
    let token = mint_token(account.id, account.username, TOKEN_TTL);
    state.issue(token.clone());
    metrics::record_refresh();
    info!(username = %account.username, "issued refreshed token");

    Json(json!({
        "id": account.id,
        "roles": [account.role],
        "token": token,
        "username": account.username,
    }))
    .into_response()
}

/// Sample protected resource.
async fn orders(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = bearer(&headers) else {
        return unauthorized("Not authenticated");
    };
    if !state.is_issued(token) {
        return unauthorized("Session expired");
    }
    if is_past_exp(token) {
        state.revoke(token);
        return unauthorized("Session expired");
    }

    Json(json!([
        {"id": 5001, "customer": "Acme Fabrication", "status": "in_production", "due": "2026-09-15"},
        {"id": 5002, "customer": "Borealis Tooling", "status": "awaiting_materials", "due": "2026-10-01"},
    ]))
    .into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn render_metrics(State(state): State<AppState>) -> String {
    state.prometheus.render()
}
