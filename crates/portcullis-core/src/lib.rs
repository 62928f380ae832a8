//! Core authentication library for Portcullis.
//!
//! Holds the parts of the admin edge that must be independently testable:
//! the credential store parsed from configuration, the constant-time
//! authenticator, and the signed session token issue/verify pair. No HTTP
//! types appear here — the server crate owns transport concerns.

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod principal;
pub mod session;
