//! Browser-facing resource routes that forward to the provisioning API.
//!
//! Each route is a thin server-side hop: the upstream client attaches
//! the API key, and the upstream status and JSON body pass through
//! unchanged. Path parameters are re-encoded before they are spliced
//! into the upstream path so a decoded `/` or `?` in an id cannot
//! rewrite the upstream route.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api` resource router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/gateways", get(list_gateways).post(create_gateway))
        .route(
            "/gateways/{id}",
            get(get_gateway).patch(update_gateway).delete(delete_gateway),
        )
        .route("/gateways/{id}/restart", post(restart_gateway))
        .route("/gateways/{id}/logs", get(gateway_logs))
        .route("/customers", get(list_customers))
        .route("/customers/{id}", get(get_customer))
        .route("/stats", get(stats))
        .route("/provision", post(provision))
        .route("/health", get(health))
}

// ── Gateways ─────────────────────────────────────────────────────────

async fn list_gateways(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    forward(&state, Method::GET, "/gateways".to_owned(), None).await
}

async fn create_gateway(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    forward(&state, Method::POST, "/gateways".to_owned(), Some(body)).await
}

async fn get_gateway(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    forward(&state, Method::GET, format!("/gateways/{}", encode(&id)), None).await
}

async fn update_gateway(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    forward(
        &state,
        Method::PATCH,
        format!("/gateways/{}", encode(&id)),
        Some(body),
    )
    .await
}

async fn delete_gateway(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    forward(
        &state,
        Method::DELETE,
        format!("/gateways/{}", encode(&id)),
        None,
    )
    .await
}

async fn restart_gateway(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    forward(
        &state,
        Method::POST,
        format!("/gateways/{}/restart", encode(&id)),
        None,
    )
    .await
}

async fn gateway_logs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    forward(
        &state,
        Method::GET,
        format!("/gateways/{}/logs", encode(&id)),
        None,
    )
    .await
}

// ── Customers ────────────────────────────────────────────────────────

async fn list_customers(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    forward(&state, Method::GET, "/customers".to_owned(), None).await
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    forward(
        &state,
        Method::GET,
        format!("/customers/{}", encode(&id)),
        None,
    )
    .await
}

// ── Stats / provisioning / health ────────────────────────────────────

async fn stats(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    forward(&state, Method::GET, "/stats".to_owned(), None).await
}

async fn provision(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    forward(&state, Method::POST, "/provision".to_owned(), Some(body)).await
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    forward(&state, Method::GET, "/health".to_owned(), None).await
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Forward one request upstream and pass status and body through.
async fn forward(
    state: &AppState,
    method: Method,
    path: String,
    body: Option<Value>,
) -> Result<Response, AppError> {
    let (status, body) = state.upstream.forward(method, &path, body).await?;
    Ok((status, Json(body)).into_response())
}

/// Percent-encode a path segment captured from the request.
fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
