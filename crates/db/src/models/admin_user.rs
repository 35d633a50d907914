//! Admin account model and DTOs.

use sqlx::FromRow;
use sweep_core::types::{DbId, Timestamp};

/// An admin row from the `admin_users` table.
///
/// Deliberately not `Serialize`: the password hash must never reach a
/// response body.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    /// Telegram account allowed to log in as this admin, if linked.
    pub telegram_id: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new admin.
pub struct CreateAdminUser {
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}
