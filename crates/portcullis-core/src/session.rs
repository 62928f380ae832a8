//! Signed session tokens.
//!
//! A session token proves a prior successful login without any
//! server-side session table. Format:
//! `base64url(claims JSON) . base64url(HMAC-SHA256(claims))`, keyed by a
//! server-held signing secret. Verification is stateless and fails
//! closed: bad structure, bad signature, or past expiry each produce a
//! typed error, never a panic.
//!
//! Expiry is the only invalidation mechanism. Each token carries a `jti`
//! so a deny-list keyed by token id could later be consulted during
//! verification without changing anything else.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::error::SessionError;
use crate::principal::{Principal, Role};

type HmacSha256 = Hmac<Sha256>;

/// Fixed session lifetime: 30 days from issuance.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Operator identity.
    sub: String,
    /// Operator role.
    role: Role,
    /// Issued-at, unix seconds.
    iat: i64,
    /// Expiry, unix seconds.
    exp: i64,
    /// Token id, reserved for a future deny-list.
    jti: String,
}

/// Issues and verifies signed session tokens.
pub struct SessionKeeper {
    key: Zeroizing<Vec<u8>>,
    ttl: Duration,
}

impl SessionKeeper {
    /// Create a keeper with the standard 30-day token lifetime.
    #[must_use]
    pub fn new(key: &[u8]) -> Self {
        Self::with_ttl(key, Duration::days(SESSION_TTL_DAYS))
    }

    /// Create a keeper with a custom token lifetime.
    #[must_use]
    pub fn with_ttl(key: &[u8], ttl: Duration) -> Self {
        Self {
            key: Zeroizing::new(key.to_vec()),
            ttl,
        }
    }

    /// Mint a token for a verified principal.
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub fn issue(&self, principal: &Principal) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: principal.id.clone(),
            role: principal.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        // Claims holds only strings and integers — serialization cannot fail.
        #[allow(clippy::unwrap_used)]
        let payload = serde_json::to_vec(&claims).unwrap();
        let sig = self.sign(&payload);

        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(sig)
        )
    }

    /// Verify a presented token, recovering the principal.
    ///
    /// Side-effect-free and safe to call on every request.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Malformed`] — wrong structure, bad base64url, or
    ///   undecodable claims.
    /// - [`SessionError::BadSignature`] — MAC mismatch.
    /// - [`SessionError::Expired`] — `exp` has passed.
    pub fn verify(&self, token: &str) -> Result<Principal, SessionError> {
        let (payload_b64, sig_b64) = token.split_once('.').ok_or(SessionError::Malformed)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| SessionError::Malformed)?;
        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| SessionError::Malformed)?;

        let expected = self.sign(&payload);
        if !bool::from(expected.ct_eq(&sig)) {
            return Err(SessionError::BadSignature);
        }

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| SessionError::Malformed)?;

        if claims.exp < Utc::now().timestamp() {
            let expired_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
                .map_or_else(|| claims.exp.to_string(), |t| t.to_rfc3339());
            return Err(SessionError::Expired { expired_at });
        }

        Ok(Principal {
            id: claims.sub,
            role: claims.role,
        })
    }

    /// HMAC-SHA256 over the serialized claims.
    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        // HMAC-SHA256 accepts any key length per RFC 2104, so
        // new_from_slice never fails here.
        #[allow(clippy::unwrap_used)]
        let mut mac = HmacSha256::new_from_slice(&self.key).unwrap();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for SessionKeeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeeper")
            .field("key", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}
