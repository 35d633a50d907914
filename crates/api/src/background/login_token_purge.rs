//! Periodic removal of spent and expired Telegram login tokens.
//!
//! Redemption never needs these rows again; they are only kept until the
//! next pass so the table stays small.

use std::time::Duration;

use sqlx::PgPool;
use sweep_db::repositories::TelegramAuthTokenRepo;
use tokio_util::sync::CancellationToken;

/// Run the purge loop until `cancel` is triggered.
///
/// The first pass runs immediately.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Login token purge job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Login token purge job stopping");
                break;
            }
            _ = ticker.tick() => {
                match TelegramAuthTokenRepo::purge_stale(&pool).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Login token purge: removed stale tokens");
                    }
                    Ok(_) => tracing::debug!("Login token purge: nothing to remove"),
                    Err(e) => {
                        tracing::error!(error = %e, "Login token purge failed");
                    }
                }
            }
        }
    }
}
