//! Server configuration for Portcullis.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `PORTCULLIS_*` environment variables.

use std::collections::HashSet;
use std::net::SocketAddr;

use uuid::Uuid;

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Delimited `identity:secret,...` operator credential list.
    pub admin_users: String,
    /// Identity given the API key as its secret when not otherwise configured.
    pub fallback_identity: String,
    /// Upstream API key; doubles as the fallback operator secret.
    pub api_key: Option<String>,
    /// Session token signing key.
    pub session_secret: Vec<u8>,
    /// Whether the signing key was generated because none was configured.
    pub session_secret_generated: bool,
    /// Origins allowed to receive CORS headers (exact match only).
    pub allowed_origins: HashSet<String>,
    /// Base URL of the upstream provisioning API.
    pub upstream_url: String,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `PORTCULLIS_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:8300`)
    /// - `PORTCULLIS_ADMIN_USERS` — `identity:secret,identity:secret,...` operator list
    /// - `PORTCULLIS_FALLBACK_IDENTITY` — fallback operator identity (default: `admin@portcullis.local`)
    /// - `PORTCULLIS_API_KEY` — upstream API key; also the fallback operator's secret
    /// - `PORTCULLIS_SESSION_SECRET` — session signing key (generated per-process when unset)
    /// - `PORTCULLIS_ALLOWED_ORIGINS` — comma-separated origin allow-list (default: empty)
    /// - `PORTCULLIS_UPSTREAM_URL` — provisioning API base URL (default: `https://api.portcullis.dev`)
    /// - `PORTCULLIS_LOG_LEVEL` — log filter (default: `info`)
    #[must_use]
    pub fn from_env() -> Self {
        // Priority: PORTCULLIS_BIND_ADDR > PORT > default 127.0.0.1:8300
        let bind_addr = if let Ok(addr) = std::env::var("PORTCULLIS_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8300)))
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(8300);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 8300))
        };

        let admin_users = std::env::var("PORTCULLIS_ADMIN_USERS").unwrap_or_default();

        let fallback_identity = std::env::var("PORTCULLIS_FALLBACK_IDENTITY")
            .unwrap_or_else(|_| "admin@portcullis.local".to_owned());

        let api_key = std::env::var("PORTCULLIS_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let (session_secret, session_secret_generated) =
            match std::env::var("PORTCULLIS_SESSION_SECRET") {
                Ok(secret) if !secret.is_empty() => (secret.into_bytes(), false),
                _ => (generate_signing_key(), true),
            };

        let allowed_origins = std::env::var("PORTCULLIS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();

        let upstream_url = std::env::var("PORTCULLIS_UPSTREAM_URL")
            .unwrap_or_else(|_| "https://api.portcullis.dev".to_owned())
            .trim_end_matches('/')
            .to_owned();

        let log_level =
            std::env::var("PORTCULLIS_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        Self {
            bind_addr,
            admin_users,
            fallback_identity,
            api_key,
            session_secret,
            session_secret_generated,
            allowed_origins,
            upstream_url,
            log_level,
        }
    }
}

/// Random per-process signing key when none is configured.
///
/// Two UUID v4s = 32 bytes of OS CSPRNG randomness. Sessions signed with
/// a generated key do not survive a process restart.
fn generate_signing_key() -> Vec<u8> {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(a.as_bytes());
    key.extend_from_slice(b.as_bytes());
    key
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("fallback_identity", &self.fallback_identity)
            .field("api_key", &"[REDACTED]")
            .field("session_secret", &"[REDACTED]")
            .field("allowed_origins", &self.allowed_origins)
            .field("upstream_url", &self.upstream_url)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}
