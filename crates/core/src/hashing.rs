//! Shared SHA-256 hex digest utility.
//!
//! One-time login secrets are stored only as this digest, so a leaked
//! `telegram_auth_tokens` table cannot be replayed.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}
