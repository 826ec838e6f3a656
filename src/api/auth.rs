//! Login gate
//!
//! A fixed username/password pair guards the portal. Successful logins get
//! a random session id in an http-only cookie; the session map lives only in
//! process memory, so a restart logs everyone out.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use axum::{
    extract::{FromRequest, Query, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::handlers::ApiResponse;
use super::server::AppState;
use crate::config::LoginSettings;

pub const SESSION_COOKIE: &str = "session";

/// In-memory session registry
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Instant>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session and return its id
    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Instant::now();

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(id.clone(), now + self.ttl);
        id
    }

    /// The single capability check the rest of the portal relies on
    pub fn is_authenticated(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(session_id)
            .is_some_and(|expires_at| *expires_at > Instant::now())
    }

    pub fn revoke(&self, session_id: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(session_id);
    }
}

/// Login form or JSON body
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub return_to: String,
}

/// Compare submitted credentials with the configured pair
pub fn credentials_match(login: &LoginSettings, username: &str, password: &str) -> bool {
    username == login.login_username && password == login.login_password
}

/// Whether `target` is a path on this site; `//host` and `/\host` are
/// treated by browsers as off-site URLs.
pub fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\")
}

/// POST /api/login - Check credentials and start a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
    request: Request,
) -> Response {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    let credentials = if is_json {
        Json::<LoginRequest>::from_request(request, &())
            .await
            .map(|Json(body)| body)
            .map_err(|e| e.body_text())
    } else {
        Form::<LoginRequest>::from_request(request, &())
            .await
            .map(|Form(body)| body)
            .map_err(|e| e.body_text())
    };

    let credentials = match credentials {
        Ok(credentials) => credentials,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::err(format!("Malformed login request: {}", message))),
            )
                .into_response();
        }
    };

    if !credentials_match(&state.login, &credentials.username, &credentials.password) {
        warn!(username = %credentials.username, "rejected login");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::err("Invalid credentials")),
        )
            .into_response();
    }

    let session_id = state.sessions.create();
    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    info!("login succeeded");

    let return_to = query
        .return_to
        .filter(|target| is_local_path(target))
        .unwrap_or_else(|| "/".to_string());

    (
        jar.add(cookie),
        Json(ApiResponse::ok(LoginResponse { return_to })),
    )
        .into_response()
}

/// GET /logout - End the session and return to the login page
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.revoke(cookie.value());
    }
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, Redirect::to("/login.html"))
}

/// Middleware guarding every protected route.
///
/// API callers get a 401 JSON body; page requests are redirected to the
/// login page with their original URI as `returnTo`.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let authenticated = jar
        .get(SESSION_COOKIE)
        .is_some_and(|cookie| state.sessions.is_authenticated(cookie.value()));

    if authenticated {
        return next.run(request).await;
    }

    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    if original.starts_with("/api/") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::err("Unauthorized, please login.")),
        )
            .into_response();
    }

    Redirect::to(&format!(
        "/login.html?returnTo={}",
        urlencoding::encode(&original)
    ))
    .into_response()
}
