//! Credential store parsed from environment configuration.
//!
//! The store is built exactly once at process start from the delimited
//! `identity:secret,identity:secret,...` configuration value plus an
//! optional fallback pair, then handed to the authenticator read-only.
//! There is no reload path — a changed credential set requires a process
//! restart.

use std::collections::HashMap;

use tracing::warn;

/// Immutable mapping from operator identity to expected secret.
pub struct CredentialStore {
    entries: HashMap<String, String>,
}

impl CredentialStore {
    /// Build the store from the delimited config value and a fallback pair.
    ///
    /// Each comma-separated entry is split on the FIRST colon, so secrets
    /// may themselves contain colons. Identity and secret are trimmed of
    /// surrounding whitespace; entries missing either half are skipped
    /// silently. A later entry for the same identity overwrites an earlier
    /// one. The fallback pair is inserted only when a fallback secret is
    /// supplied and the identity is not already configured.
    ///
    /// An empty result is allowed but logged as a security warning: with
    /// no credentials configured, every authorization attempt fails
    /// closed and no operator can log in.
    #[must_use]
    pub fn build(
        admin_users: &str,
        fallback_identity: &str,
        fallback_secret: Option<&str>,
    ) -> Self {
        let mut entries = HashMap::new();

        for pair in admin_users.split(',') {
            let Some((identity, secret)) = pair.split_once(':') else {
                continue;
            };
            let identity = identity.trim();
            let secret = secret.trim();
            if identity.is_empty() || secret.is_empty() {
                continue;
            }
            entries.insert(identity.to_owned(), secret.to_owned());
        }

        if let Some(secret) = fallback_secret {
            let identity = fallback_identity.trim();
            if !identity.is_empty() && !secret.is_empty() && !entries.contains_key(identity) {
                entries.insert(identity.to_owned(), secret.to_owned());
            }
        }

        if entries.is_empty() {
            warn!("credential store is empty — every login attempt will be rejected");
        }

        Self { entries }
    }

    /// Look up the expected secret for an identity.
    #[must_use]
    pub fn expected_secret(&self, identity: &str) -> Option<&str> {
        self.entries.get(identity).map(String::as_str)
    }

    /// Number of configured identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no credentials are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("identities", &self.entries.len())
            .finish_non_exhaustive()
    }
}
