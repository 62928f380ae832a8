//! Portcullis HTTP edge.
//!
//! Wires the core auth library into a running Axum server: every inbound
//! request passes the gatekeeper middleware before any protected page is
//! served, login mints signed session tokens, and `/api/` routes forward
//! to the upstream provisioning API with the server-held key attached.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod upstream;
