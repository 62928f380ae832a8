//! Credential validation.
//!
//! Validates a presented (identity, secret) pair against the credential
//! store. Secret comparison uses `subtle::ConstantTimeEq`: when lengths
//! match, the comparison always runs over the full secret with no
//! data-dependent early exit. Unknown identity and wrong secret produce
//! the same error so callers cannot enumerate identities.

use subtle::ConstantTimeEq;

use crate::credentials::CredentialStore;
use crate::error::AuthError;
use crate::principal::{Principal, Role};

/// Validates operator credentials against the configured store.
#[derive(Debug)]
pub struct Authenticator {
    store: CredentialStore,
}

impl Authenticator {
    /// Create an authenticator over an already-built credential store.
    #[must_use]
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    /// Validate a presented (identity, secret) pair.
    ///
    /// Never logs the secret and never reveals whether the identity
    /// exists. With an empty store this fails closed for every input.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown identity
    /// or a secret mismatch — deliberately without distinguishing the two.
    pub fn authorize(&self, identity: &str, secret: &str) -> Result<Principal, AuthError> {
        let expected = self
            .store
            .expected_secret(identity)
            .ok_or(AuthError::InvalidCredentials)?;

        // `ct_eq` on slices rejects a length mismatch up front, then
        // compares every byte without early exit.
        if bool::from(expected.as_bytes().ct_eq(secret.as_bytes())) {
            Ok(Principal {
                id: identity.to_owned(),
                role: Role::Admin,
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
