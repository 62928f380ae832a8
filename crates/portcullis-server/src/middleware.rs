//! Request gatekeeping middleware for Portcullis.
//!
//! Every inbound request passes through [`gatekeeper`] before anything
//! else is served. The decision is one-shot, with five terminal branches
//! evaluated in order: stage CORS headers, short-circuit preflight,
//! bypass public prefixes, forward verified sessions, redirect everything
//! else to login with the original path as the return target.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "portcullis_session";

/// Path prefixes served without a session: the login page, the API
/// routes, static assets, and the favicon.
pub const PUBLIC_PREFIXES: &[&str] = &["/login", "/api/", "/assets/", "/favicon.ico"];

/// Gate a single request.
///
/// Requests that reach a protected page carry a verified
/// [`Principal`](portcullis_core::principal::Principal) in their
/// extensions. Session failures are never surfaced as errors — they
/// become a redirect to `/login?callbackUrl=<path>`.
pub async fn gatekeeper(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let cors = cors_headers(req.headers(), &state.allowed_origins);

    // Preflight terminates here regardless of path or session state.
    if req.method() == Method::OPTIONS {
        return with_headers(StatusCode::OK.into_response(), &cors);
    }

    let path = req.uri().path().to_owned();

    if is_public(&path) {
        return with_headers(next.run(req).await, &cors);
    }

    match extract_token(req.headers()).map(|token| state.sessions.verify(&token)) {
        Some(Ok(principal)) => {
            req.extensions_mut().insert(principal);
            with_headers(next.run(req).await, &cors)
        }
        outcome => {
            if let Some(Err(err)) = outcome {
                debug!(path = %path, error = %err, "session verification failed");
            }
            let target = format!("/login?callbackUrl={}", urlencoding::encode(&path));
            with_headers(Redirect::temporary(&target).into_response(), &cors)
        }
    }
}

/// Stage CORS headers for a request.
///
/// Headers are produced only when the `Origin` header exactly equals an
/// allow-list entry — case-sensitive, no wildcard, no subdomain matching.
/// Same-origin and non-browser requests carry no `Origin` and get none.
fn cors_headers(headers: &HeaderMap, allowed: &HashSet<String>) -> HeaderMap {
    let mut staged = HeaderMap::new();

    let Some(origin) = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok()) else {
        return staged;
    };
    if !allowed.contains(origin) {
        return staged;
    }
    let Ok(origin_value) = HeaderValue::from_str(origin) else {
        return staged;
    };

    staged.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
    staged.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    staged.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    staged.insert(header::VARY, HeaderValue::from_static("Origin"));

    staged
}

/// Attach staged headers to a response.
fn with_headers(mut response: Response, staged: &HeaderMap) -> Response {
    for (name, value) in staged {
        response.headers_mut().insert(name, value.clone());
    }
    response
}

/// Whether a path bypasses the session check.
fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Extract the session token from the request: cookie first, then
/// `Authorization: Bearer` for non-browser clients.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = cookie_value(headers, SESSION_COOKIE) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// Value of a named cookie in the `Cookie` header, if present.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}
