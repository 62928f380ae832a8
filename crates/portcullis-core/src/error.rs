//! Error types for `portcullis-core`.
//!
//! Credential failures are deliberately generic — the same error comes
//! back whether the identity is unknown or the secret is wrong, so a
//! caller cannot enumerate identities. Session failures carry the cause;
//! the server layer decides how much of it to surface.

/// Errors from credential validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Identity unknown or secret mismatch. Never says which.
    #[error("invalid email or password")]
    InvalidCredentials,
}

/// Errors from session token issue and verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The token is structurally invalid: wrong part count, bad
    /// base64url encoding, or undecodable claims.
    #[error("malformed session token")]
    Malformed,

    /// The signature does not match the claims.
    #[error("session token signature mismatch")]
    BadSignature,

    /// The token's expiry has passed.
    #[error("session token expired at {expired_at}")]
    Expired { expired_at: String },
}
