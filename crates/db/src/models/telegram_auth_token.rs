//! One-time Telegram login token rows.

use sqlx::FromRow;
use sweep_core::identity::TelegramIdentity;
use sweep_core::types::{DbId, Timestamp};

/// A row from the `telegram_auth_tokens` table.
#[derive(Debug, Clone, FromRow)]
pub struct TelegramAuthToken {
    pub id: DbId,
    pub token_hash: String,
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub telegram_first_name: Option<String>,
    pub telegram_last_name: Option<String>,
    pub expires_at: Timestamp,
    /// `None` while the token is still redeemable.
    pub consumed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl TelegramAuthToken {
    /// The identity snapshot captured when the token was issued.
    pub fn identity(&self) -> TelegramIdentity {
        TelegramIdentity {
            telegram_id: self.telegram_id,
            username: self.telegram_username.clone(),
            first_name: self.telegram_first_name.clone(),
            last_name: self.telegram_last_name.clone(),
        }
    }
}

/// DTO for persisting a freshly issued token.
pub struct CreateTelegramAuthToken {
    pub token_hash: String,
    pub identity: TelegramIdentity,
    pub expires_at: Timestamp,
}
