//! Domain error taxonomy shared across crates.
//!
//! The HTTP layer maps each variant onto a status code; repositories never
//! construct these directly (they return `sqlx::Error`).

/// Domain-level failure.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Lookup by id or slug found nothing. `key` is rendered verbatim.
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Every credential failure (malformed, forged, expired, consumed)
    /// ends up here with the same message.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by a numeric id.
    pub fn not_found(entity: &'static str, id: crate::types::DbId) -> Self {
        Self::NotFound {
            entity,
            key: id.to_string(),
        }
    }
}
