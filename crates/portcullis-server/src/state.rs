//! Shared application state for the Portcullis server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. The credential store inside the authenticator
//! is built once, before the listener starts, and is read-only for the
//! rest of the process lifetime.

use std::collections::HashSet;

use portcullis_core::authenticator::Authenticator;
use portcullis_core::session::SessionKeeper;

use crate::upstream::UpstreamClient;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Credential validation.
    pub authenticator: Authenticator,
    /// Session token issue/verify.
    pub sessions: SessionKeeper,
    /// Origins allowed to receive CORS headers (exact match only).
    pub allowed_origins: HashSet<String>,
    /// Server-side client for the upstream provisioning API.
    pub upstream: UpstreamClient,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
