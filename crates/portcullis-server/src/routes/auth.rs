//! Operator authentication routes: `/api/auth/*`
//!
//! Login validates credentials and mints the session cookie; logout
//! expires it; the session route lets the browser (or a non-browser
//! client) check who it currently is.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{self, HeaderMap};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, info};

use portcullis_core::principal::Principal;
use portcullis_core::session::SESSION_TTL_DAYS;

use crate::error::AppError;
use crate::middleware::{extract_token, SESSION_COOKIE};
use crate::state::AppState;

/// Build the `/api/auth` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
}

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Validate credentials and set the session cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let principal = state
        .authenticator
        .authorize(&body.email, &body.password)
        .inspect_err(|_| debug!(identity = %body.email, "login rejected"))?;

    let token = state.sessions.issue(&principal);
    info!(operator = %principal.id, "operator logged in");

    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(principal),
    )
        .into_response())
}

/// Expire the session cookie.
///
/// Tokens themselves stay valid until expiry (stateless sessions); this
/// only clears the browser's copy.
async fn logout() -> Response {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, expired_cookie())],
    )
        .into_response()
}

/// Return the principal for the presented session token.
async fn session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Principal>, AppError> {
    let token = extract_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("no session".to_owned()))?;
    let principal = state.sessions.verify(&token)?;
    Ok(Json(principal))
}

// ── Helpers ──────────────────────────────────────────────────────────

/// `Set-Cookie` value carrying a fresh session token.
fn session_cookie(token: &str) -> String {
    let max_age = 60 * 60 * 24 * SESSION_TTL_DAYS;
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}

/// `Set-Cookie` value that expires the session cookie.
fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
