//! Random one-time secrets and constant-time comparison.

use rand::Rng;
use subtle::ConstantTimeEq;

use crate::hashing::sha256_hex;

/// Length of a generated one-time secret. 48 alphanumeric characters carry
/// roughly 285 bits of entropy and need no URL escaping.
pub const ONE_TIME_SECRET_LENGTH: usize = 48;

/// A freshly generated secret together with the digest that gets persisted.
#[derive(Debug, Clone)]
pub struct OneTimeSecret {
    /// Handed to the user exactly once; never stored.
    pub plaintext: String,
    /// SHA-256 hex of `plaintext`; the only form written to the database.
    pub hash: String,
}

/// Generate a new URL-safe one-time secret.
pub fn generate_one_time_secret() -> OneTimeSecret {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(ONE_TIME_SECRET_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_one_time_secret(&plaintext);
    OneTimeSecret { plaintext, hash }
}

/// Digest a candidate secret for lookup.
pub fn hash_one_time_secret(secret: &str) -> String {
    sha256_hex(secret.as_bytes())
}

/// Compare two byte strings without short-circuiting on the first mismatch.
///
/// Lengths are not secret: inputs of different length compare unequal
/// immediately.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
