//! Repository for the `telegram_auth_tokens` table.
//!
//! A token is redeemable while `consumed_at IS NULL AND expires_at > NOW()`.
//! [`TelegramAuthTokenRepo::consume`] checks and flips that state in one
//! statement, so concurrent redemptions of one token cannot both succeed.

use sqlx::PgPool;

use crate::models::telegram_auth_token::{CreateTelegramAuthToken, TelegramAuthToken};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token_hash, telegram_id, telegram_username, telegram_first_name, \
                       telegram_last_name, expires_at, consumed_at, created_at";

/// Persists and redeems one-time Telegram login tokens.
pub struct TelegramAuthTokenRepo;

impl TelegramAuthTokenRepo {
    /// Insert a new, unconsumed token row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTelegramAuthToken,
    ) -> Result<TelegramAuthToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO telegram_auth_tokens
                (token_hash, telegram_id, telegram_username, telegram_first_name,
                 telegram_last_name, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TelegramAuthToken>(&query)
            .bind(&input.token_hash)
            .bind(input.identity.telegram_id)
            .bind(&input.identity.username)
            .bind(&input.identity.first_name)
            .bind(&input.identity.last_name)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Mark the token with this hash consumed, if it is still redeemable.
    ///
    /// Returns the row as it was consumed, or `None` when the hash is
    /// unknown, expired or already used. The three cases are
    /// indistinguishable on purpose.
    pub async fn consume(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<TelegramAuthToken>, sqlx::Error> {
        let query = format!(
            "UPDATE telegram_auth_tokens
             SET consumed_at = NOW()
             WHERE token_hash = $1
               AND consumed_at IS NULL
               AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TelegramAuthToken>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Delete expired or consumed tokens. Returns the count of deleted rows.
    pub async fn purge_stale(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM telegram_auth_tokens
             WHERE expires_at <= NOW() OR consumed_at IS NOT NULL",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
