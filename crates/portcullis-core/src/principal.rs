//! The verified identity produced by a successful login.

use serde::{Deserialize, Serialize};

/// Role attached to an authenticated operator.
///
/// Only `Admin` exists today; the enum keeps the wire format stable if
/// further roles are ever added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
}

/// A verified operator identity.
///
/// A `Principal` is only ever produced by a successful
/// [`Authenticator::authorize`](crate::authenticator::Authenticator::authorize)
/// call, or by verifying a session token that was minted from one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Operator identity (the configured login email).
    pub id: String,
    /// Operator role.
    pub role: Role,
}
