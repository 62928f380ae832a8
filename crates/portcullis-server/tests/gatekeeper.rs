//! Integration tests for the assembled Portcullis router.
//!
//! Drives the exact router the binary serves, in-process, with
//! `tower::ServiceExt::oneshot` — no listener, no network, no running
//! upstream API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use portcullis_core::authenticator::Authenticator;
use portcullis_core::credentials::CredentialStore;
use portcullis_core::principal::{Principal, Role};
use portcullis_core::session::SessionKeeper;

use portcullis_server::app;
use portcullis_server::state::AppState;
use portcullis_server::upstream::UpstreamClient;

const SIGNING_KEY: &[u8] = b"integration-signing-key";
const ALLOWED_ORIGIN: &str = "https://admin.example.com";

fn test_app() -> axum::Router {
    let store =
        CredentialStore::build("a@x.com:secret1,b@x.com:secret2", "admin@x.com", Some("fb"));
    let state = Arc::new(AppState {
        authenticator: Authenticator::new(store),
        sessions: SessionKeeper::new(SIGNING_KEY),
        allowed_origins: [ALLOWED_ORIGIN.to_owned()].into_iter().collect(),
        // Non-existent upstream — proxy tests expect a 502, nothing else
        // touches it.
        upstream: UpstreamClient::new("http://127.0.0.1:19999", None).unwrap(),
    });
    app::router(state)
}

fn admin_token() -> String {
    SessionKeeper::new(SIGNING_KEY).issue(&Principal {
        id: "a@x.com".to_owned(),
        role: Role::Admin,
    })
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ── Preflight ────────────────────────────────────────────────────────

#[tokio::test]
async fn options_returns_200_with_no_body_on_any_path() {
    for path in ["/dashboard", "/api/gateways", "/login", "/nonexistent"] {
        let req = Request::builder()
            .method("OPTIONS")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "OPTIONS {path}");
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty(), "OPTIONS {path} must have no body");
    }
}

#[tokio::test]
async fn preflight_from_allowed_origin_carries_cors_headers() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/dashboard")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .body(Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "GET, POST, OPTIONS"
    );
    assert_eq!(res.headers().get(header::VARY).unwrap(), "Origin");
}

// ── CORS on ordinary requests ────────────────────────────────────────

#[tokio::test]
async fn allowed_origin_is_echoed_on_public_pages() {
    let req = Request::builder()
        .uri("/login")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .body(Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );
}

#[tokio::test]
async fn unlisted_origins_get_no_cors_headers() {
    for origin in [
        "https://evil.example.com",
        "https://sub.admin.example.com",
        "http://admin.example.com",
    ] {
        let req = Request::builder()
            .uri("/login")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none(),
            "origin {origin:?} must not be echoed"
        );
    }
}

// ── Public prefixes ──────────────────────────────────────────────────

#[tokio::test]
async fn login_page_is_served_without_a_session() {
    let res = test_app().oneshot(get("/login")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn public_prefix_paths_are_forwarded_not_redirected() {
    // No favicon route exists — a public path falls through to 404
    // rather than bouncing to login.
    let res = test_app().oneshot(get("/favicon.ico")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get(header::LOCATION).is_none());
}

// ── Protected paths ──────────────────────────────────────────────────

#[tokio::test]
async fn missing_session_redirects_to_login_with_callback() {
    let res = test_app().oneshot(get("/dashboard")).await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers().get(header::LOCATION).unwrap(),
        "/login?callbackUrl=%2Fdashboard"
    );
}

#[tokio::test]
async fn redirect_preserves_the_exact_original_path() {
    let res = test_app()
        .oneshot(get("/gateways/gw-42/settings"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers().get(header::LOCATION).unwrap(),
        "/login?callbackUrl=%2Fgateways%2Fgw-42%2Fsettings"
    );
}

#[tokio::test]
async fn valid_session_cookie_reaches_protected_pages() {
    let req = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, format!("portcullis_session={}", admin_token()))
        .body(Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn valid_bearer_token_reaches_protected_pages() {
    let req = Request::builder()
        .uri("/dashboard")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
        .body(Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_session_redirects_to_login() {
    let expired = SessionKeeper::with_ttl(SIGNING_KEY, chrono::Duration::seconds(-60)).issue(
        &Principal {
            id: "a@x.com".to_owned(),
            role: Role::Admin,
        },
    );
    let req = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, format!("portcullis_session={expired}"))
        .body(Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn tampered_session_redirects_to_login() {
    let foreign = SessionKeeper::new(b"some-other-key").issue(&Principal {
        id: "a@x.com".to_owned(),
        role: Role::Admin,
    });
    let req = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, format!("portcullis_session={foreign}"))
        .body(Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
}

// ── Login flow ───────────────────────────────────────────────────────

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({"email": email, "password": password}).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn login_sets_a_usable_session_cookie() {
    let app = test_app();

    let res = app
        .clone()
        .oneshot(login_request("a@x.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(cookie.starts_with("portcullis_session="));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(res).await;
    assert_eq!(body["id"], "a@x.com");
    assert_eq!(body["role"], "admin");

    // The minted cookie opens protected pages.
    let session = cookie.split(';').next().unwrap().to_owned();
    let req = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, session)
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn fallback_operator_can_log_in() {
    let res = test_app()
        .oneshot(login_request("admin@x.com", "fb"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn bad_credentials_are_rejected_with_a_generic_message() {
    let app = test_app();

    let wrong_secret = app
        .clone()
        .oneshot(login_request("a@x.com", "secret2"))
        .await
        .unwrap();
    assert_eq!(wrong_secret.status(), StatusCode::UNAUTHORIZED);
    let wrong_secret_body = body_json(wrong_secret).await;
    assert_eq!(wrong_secret_body["message"], "invalid email or password");

    // Unknown identity yields a byte-identical body.
    let unknown = app
        .oneshot(login_request("nobody@x.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(unknown).await, wrong_secret_body);
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("portcullis_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

// ── Session endpoint ─────────────────────────────────────────────────

#[tokio::test]
async fn session_endpoint_returns_the_principal() {
    let req = Request::builder()
        .uri("/api/auth/session")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
        .body(Body::empty())
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["id"], "a@x.com");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn session_endpoint_rejects_missing_tokens() {
    let res = test_app().oneshot(get("/api/auth/session")).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

// ── Upstream proxy ───────────────────────────────────────────────────

#[tokio::test]
async fn unreachable_upstream_maps_to_bad_gateway() {
    let res = test_app().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(res).await;
    assert_eq!(body["error"], "bad_gateway");
}

// ── Response hardening ───────────────────────────────────────────────

#[tokio::test]
async fn responses_carry_hardening_headers() {
    let res = test_app().oneshot(get("/login")).await.unwrap();
    assert_eq!(
        res.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );
    assert_eq!(res.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
}
