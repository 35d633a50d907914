//! Stateless admin session tokens.
//!
//! Wire format: `"{subject_id}:{expires_at}:{signature}"`, where
//! `signature` is the first 8 bytes of
//! HMAC-SHA256(secret, `"{subject_id}:{expires_at}"`) as 16 lowercase hex
//! characters. Nothing is stored server-side: a token is valid until
//! `expires_at` passes and cannot be revoked earlier.
//!
//! Verification reports a [`TokenRejection`] reason for logging only. The
//! HTTP layer turns every reason into the same 401 response.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use sweep_core::secrets::constant_time_eq;
use sweep_core::types::DbId;

type HmacSha256 = Hmac<Sha256>;

/// Default session lifetime in days.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// Longest session lifetime configuration accepts, in days.
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

/// Minimum accepted length of `SESSION_SECRET`, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Truncated MAC length in bytes.
const SIGNATURE_BYTES: usize = 8;
const SIGNATURE_HEX_LEN: usize = SIGNATURE_BYTES * 2;

const SECONDS_PER_DAY: i64 = 86_400;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Signing key and lifetime for session tokens.
#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 key. Never logged.
    pub secret: String,
    /// Token lifetime in days (default: 7).
    pub ttl_days: i64,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("ttl_days", &self.ttl_days)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenRejection {
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("signature mismatch")]
    BadSignature,
}

/// A decoded (not yet verified) session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub subject_id: DbId,
    /// Unix timestamp in seconds.
    pub expires_at: i64,
    pub signature: String,
}

impl SessionToken {
    pub fn encode(&self) -> String {
        format!("{}:{}:{}", self.subject_id, self.expires_at, self.signature)
    }

    /// Parse the wire format. Only the shape is checked here: exactly three
    /// fields, canonical decimal integers, 16 lowercase hex characters.
    pub fn decode(raw: &str) -> Result<Self, TokenRejection> {
        let mut fields = raw.split(':');
        let (Some(subject), Some(expires), Some(signature), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(TokenRejection::Malformed);
        };

        let subject_id = parse_canonical_int(subject)?;
        let expires_at = parse_canonical_int(expires)?;

        let hex_ok = signature.len() == SIGNATURE_HEX_LEN
            && signature
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !hex_ok {
            return Err(TokenRejection::Malformed);
        }

        Ok(Self {
            subject_id,
            expires_at,
            signature: signature.to_string(),
        })
    }
}

/// Non-negative decimal without sign, padding or leading zeros.
fn parse_canonical_int(field: &str) -> Result<i64, TokenRejection> {
    let canonical = !field.is_empty()
        && field.bytes().all(|b| b.is_ascii_digit())
        && (field == "0" || !field.starts_with('0'));
    if !canonical {
        return Err(TokenRejection::Malformed);
    }
    field.parse().map_err(|_| TokenRejection::Malformed)
}

// ---------------------------------------------------------------------------
// Authority
// ---------------------------------------------------------------------------

/// Issues and verifies session tokens with a fixed key.
pub struct SessionAuthority {
    secret: Vec<u8>,
    ttl_secs: i64,
}

impl SessionAuthority {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            secret: config.secret.as_bytes().to_vec(),
            ttl_secs: config.ttl_days.saturating_mul(SECONDS_PER_DAY),
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for `subject_id` expiring one TTL from now.
    pub fn issue(&self, subject_id: DbId) -> SessionToken {
        self.issue_at(subject_id, Utc::now().timestamp())
    }

    pub fn issue_at(&self, subject_id: DbId, now: i64) -> SessionToken {
        let expires_at = now.saturating_add(self.ttl_secs);
        SessionToken {
            subject_id,
            expires_at,
            signature: self.sign(subject_id, expires_at),
        }
    }

    /// Verify `raw` against the wall clock and return its subject.
    pub fn verify(&self, raw: &str) -> Result<DbId, TokenRejection> {
        self.verify_at(raw, Utc::now().timestamp())
    }

    /// Verify `raw` as of `now` (Unix seconds).
    ///
    /// The signature and expiry are both evaluated before either result is
    /// looked at, so a stale token and a forged one cost the same time.
    pub fn verify_at(&self, raw: &str, now: i64) -> Result<DbId, TokenRejection> {
        let token = SessionToken::decode(raw)?;

        let expected = self.sign(token.subject_id, token.expires_at);
        let signature_ok = constant_time_eq(expected.as_bytes(), token.signature.as_bytes());
        let fresh = token.expires_at >= now;

        match (signature_ok, fresh) {
            (false, _) => Err(TokenRejection::BadSignature),
            (true, false) => Err(TokenRejection::Expired),
            (true, true) => Ok(token.subject_id),
        }
    }

    fn sign(&self, subject_id: DbId, expires_at: i64) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(format!("{subject_id}:{expires_at}").as_bytes());
        let digest = mac.finalize().into_bytes();
        digest[..SIGNATURE_BYTES]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}
