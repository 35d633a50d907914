use std::sync::Arc;

use sweep_telegram::{BotClient, DisabledNotifier, Notifier, TelegramError};

use crate::auth::session::SessionAuthority;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or is a pool/client handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sweep_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Issues and verifies admin session tokens.
    pub sessions: Arc<SessionAuthority>,
    /// Bot API client for webhook replies and direct sends. `None` when no
    /// bot token is configured.
    pub bot: Option<BotClient>,
    /// Destination for live guest notifications.
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Build state from configuration. The notifier is the bot client when a
    /// bot token is set and a no-op otherwise.
    pub fn new(pool: sweep_db::DbPool, config: ServerConfig) -> Result<Self, TelegramError> {
        let sessions = Arc::new(SessionAuthority::new(&config.session));
        let bot = config
            .telegram
            .bot
            .as_ref()
            .map(BotClient::new)
            .transpose()?;
        let notifier: Arc<dyn Notifier> = match &bot {
            Some(client) => Arc::new(client.clone()),
            None => Arc::new(DisabledNotifier),
        };

        Ok(Self {
            pool,
            config: Arc::new(config),
            sessions,
            bot,
            notifier,
        })
    }

    /// Replace the notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}
