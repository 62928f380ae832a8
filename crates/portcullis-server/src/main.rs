//! Portcullis server entry point.
//!
//! Builds the credential store and session keeper from environment
//! configuration, assembles the router behind the gatekeeper, and serves
//! with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use portcullis_core::authenticator::Authenticator;
use portcullis_core::credentials::CredentialStore;
use portcullis_core::session::SessionKeeper;

use portcullis_server::app;
use portcullis_server::config::ServerConfig;
use portcullis_server::state::AppState;
use portcullis_server::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    if config.session_secret_generated {
        warn!(
            "PORTCULLIS_SESSION_SECRET is not set — using a per-process signing key; \
             sessions will not survive a restart"
        );
    }
    if config.api_key.is_none() {
        warn!(
            "PORTCULLIS_API_KEY is not set — upstream calls go out unauthenticated \
             and the fallback operator is disabled"
        );
    }

    info!(upstream = %config.upstream_url, "portcullis starting");

    let state = build_app_state(&config)?;
    let router = app::router(Arc::clone(&state));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "portcullis listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("portcullis stopped");
    Ok(())
}

/// Build the shared application state.
///
/// The credential store is constructed exactly once here, before the
/// listener starts; request handling only ever reads it.
fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let store = CredentialStore::build(
        &config.admin_users,
        &config.fallback_identity,
        config.api_key.as_deref(),
    );
    info!(identities = store.len(), "credential store built");

    let upstream = UpstreamClient::new(&config.upstream_url, config.api_key.clone())
        .context("failed to build upstream client")?;

    Ok(Arc::new(AppState {
        authenticator: Authenticator::new(store),
        sessions: SessionKeeper::new(&config.session_secret),
        allowed_origins: config.allowed_origins.clone(),
        upstream,
    }))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
