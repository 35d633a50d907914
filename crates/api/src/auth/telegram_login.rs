//! Out-of-band "login via Telegram" handshake.
//!
//! The bot issues a one-time secret to whoever sends `/start web_auth` and
//! replies with a link carrying it. The web app later redeems the secret for
//! the Telegram identity it was issued to. Only the SHA-256 of the secret is
//! stored; redemption is a single conditional UPDATE, so a secret is
//! accepted at most once and never after its five-minute window.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use sweep_core::identity::TelegramIdentity;
use sweep_core::secrets::{generate_one_time_secret, hash_one_time_secret};
use sweep_db::models::telegram_auth_token::CreateTelegramAuthToken;
use sweep_db::repositories::TelegramAuthTokenRepo;

/// How long an issued secret stays redeemable.
pub const LOGIN_TOKEN_TTL_MINUTES: i64 = 5;

/// Path on the web app that redeems a secret.
const CALLBACK_PATH: &str = "/auth/telegram/callback";

/// Issue a one-time login secret for `identity` and return its plaintext.
///
/// Exactly one row is written per call.
pub async fn issue(pool: &PgPool, identity: &TelegramIdentity) -> Result<String, sqlx::Error> {
    let secret = generate_one_time_secret();
    let input = CreateTelegramAuthToken {
        token_hash: secret.hash,
        identity: identity.clone(),
        expires_at: Utc::now() + Duration::minutes(LOGIN_TOKEN_TTL_MINUTES),
    };
    let row = TelegramAuthTokenRepo::create(pool, &input).await?;
    tracing::info!(
        token_id = row.id,
        telegram_id = identity.telegram_id,
        "Issued Telegram login token"
    );
    Ok(secret.plaintext)
}

/// Redeem `candidate`, returning the identity it was issued to.
///
/// `None` covers unknown, expired and already redeemed secrets alike.
pub async fn redeem(
    pool: &PgPool,
    candidate: &str,
) -> Result<Option<TelegramIdentity>, sqlx::Error> {
    let hash = hash_one_time_secret(candidate);
    let consumed = TelegramAuthTokenRepo::consume(pool, &hash).await?;
    match consumed {
        Some(row) => {
            tracing::info!(
                token_id = row.id,
                telegram_id = row.telegram_id,
                "Redeemed Telegram login token"
            );
            Ok(Some(row.identity()))
        }
        None => {
            tracing::debug!("Telegram login token rejected");
            Ok(None)
        }
    }
}

/// Web app URL that redeems `secret`.
pub fn callback_url(site_url: &str, secret: &str) -> String {
    format!(
        "{}{CALLBACK_PATH}?token={secret}",
        site_url.trim_end_matches('/')
    )
}
