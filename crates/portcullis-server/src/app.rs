//! Router assembly.
//!
//! Kept separate from `main` so the integration tests can drive the
//! exact router the binary serves.

use std::sync::Arc;

use axum::http::header;
use axum::http::HeaderValue;
use axum::middleware as axum_mw;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::gatekeeper;
use crate::routes;
use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // Login is concurrency-limited to blunt credential-stuffing bursts.
        .nest(
            "/auth",
            routes::auth::router().layer(tower::limit::ConcurrencyLimitLayer::new(10)),
        )
        .merge(routes::proxy::router());

    Router::new()
        .nest("/api", api)
        .merge(routes::ui::router())
        // The gatekeeper wraps the whole router so unmatched paths and
        // preflights on any path are gated too.
        .layer(axum_mw::from_fn_with_state(Arc::clone(&state), gatekeeper))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}
