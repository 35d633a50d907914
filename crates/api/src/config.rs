use std::fmt::Display;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use sweep_telegram::client::{BotConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};

use crate::auth::session::{
    SessionConfig, DEFAULT_SESSION_TTL_DAYS, MAX_SESSION_TTL_DAYS, MIN_SECRET_LEN,
};

/// Startup configuration problem. Aborts the binary before it binds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Server configuration loaded from environment variables.
///
/// Everything except `SESSION_SECRET` has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session token signing key and lifetime.
    pub session: SessionConfig,
    /// Public web app origin, used to build Telegram login links.
    pub site_url: String,
    pub telegram: TelegramConfig,
    /// Cadence of the stale login token purge (default: `600`).
    pub login_token_purge_interval_secs: u64,
    /// First admin account, created only when no admin exists yet.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Telegram bot settings. All optional: without a bot token the bot is
/// disabled and notifications are dropped.
#[derive(Clone, Default)]
pub struct TelegramConfig {
    pub bot: Option<BotConfig>,
    /// Bot's own username, without `@`. Used to spot the bot being added to
    /// a group.
    pub bot_username: Option<String>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` header value.
    pub webhook_secret: Option<String>,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot", &self.bot)
            .field("bot_username", &self.bot_username)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                           | Default                    |
    /// |-----------------------------------|----------------------------|
    /// | `HOST`                            | `0.0.0.0`                  |
    /// | `PORT`                            | `3000`                     |
    /// | `CORS_ORIGINS`                    | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`            | `30`                       |
    /// | `SESSION_SECRET`                  | **required**, >= 16 bytes  |
    /// | `SESSION_TTL_DAYS`                | `7`, at most `3650`        |
    /// | `SITE_URL`                        | `http://localhost:5173`    |
    /// | `TELEGRAM_BOT_TOKEN`              | unset (bot disabled)       |
    /// | `TELEGRAM_API_URL`                | `https://api.telegram.org` |
    /// | `TELEGRAM_BOT_USERNAME`           | unset                      |
    /// | `TELEGRAM_WEBHOOK_SECRET`         | unset (no header check)    |
    /// | `TELEGRAM_TIMEOUT_SECS`           | `5`                        |
    /// | `LOGIN_TOKEN_PURGE_INTERVAL_SECS` | `600`                      |
    /// | `BOOTSTRAP_ADMIN_USERNAME`        | unset                      |
    /// | `BOOTSTRAP_ADMIN_PASSWORD`        | unset                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parsed("HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = env.parsed("PORT", 3000u16)?;
        let cors_origins = parse_origins(
            &env.optional("CORS_ORIGINS")
                .unwrap_or_else(|| "http://localhost:5173".into()),
        )?;
        let request_timeout_secs = env.positive("REQUEST_TIMEOUT_SECS", 30)?;

        let secret = env.secret("SESSION_SECRET")?.ok_or(ConfigError::Missing("SESSION_SECRET"))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                var: "SESSION_SECRET",
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }
        let ttl_days = env.positive("SESSION_TTL_DAYS", DEFAULT_SESSION_TTL_DAYS as u64)?;
        let ttl_days = i64::try_from(ttl_days)
            .ok()
            .filter(|days| *days <= MAX_SESSION_TTL_DAYS)
            .ok_or_else(|| ConfigError::Invalid {
                var: "SESSION_TTL_DAYS",
                reason: format!("must be at most {MAX_SESSION_TTL_DAYS}"),
            })?;
        let session = SessionConfig { secret, ttl_days };

        let site_url = env
            .optional("SITE_URL")
            .unwrap_or_else(|| "http://localhost:5173".into());
        if !(site_url.starts_with("http://") || site_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "SITE_URL",
                reason: "must start with http:// or https://".into(),
            });
        }
        let site_url = site_url.trim_end_matches('/').to_string();

        let telegram_timeout = env.positive("TELEGRAM_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs())?;
        let bot = env.optional("TELEGRAM_BOT_TOKEN").map(|token| BotConfig {
            token,
            api_url: env
                .optional("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.into()),
            timeout: Duration::from_secs(telegram_timeout),
        });
        let telegram = TelegramConfig {
            bot,
            bot_username: env
                .optional("TELEGRAM_BOT_USERNAME")
                .map(|name| name.trim_start_matches('@').to_string()),
            webhook_secret: env.secret("TELEGRAM_WEBHOOK_SECRET")?,
        };

        let login_token_purge_interval_secs =
            env.positive("LOGIN_TOKEN_PURGE_INTERVAL_SECS", 600)?;

        let bootstrap_admin = match (
            env.optional("BOOTSTRAP_ADMIN_USERNAME"),
            env.secret("BOOTSTRAP_ADMIN_PASSWORD")?,
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_USERNAME")),
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session,
            site_url,
            telegram,
            login_token_purge_interval_secs,
            bootstrap_admin,
        })
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                reason: format!("'{origin}': {e}"),
            })
        })
        .collect()
}

/// Variable lookup with trimming and typed parsing.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed value, with empty strings treated as unset.
    fn optional(&self, var: &str) -> Option<String> {
        (self.0)(var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Credentials are used byte for byte. Blank counts as unset; leading or
    /// trailing whitespace is rejected instead of being trimmed away.
    fn secret(&self, var: &'static str) -> Result<Option<String>, ConfigError> {
        match (self.0)(var) {
            Some(v) if v.trim().is_empty() => Ok(None),
            Some(v) if v.trim().len() != v.len() => Err(ConfigError::Invalid {
                var,
                reason: "must not start or end with whitespace".into(),
            }),
            other => Ok(other),
        }
    }

    fn parsed<T>(&self, var: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(var) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: format!("'{raw}': {e}"),
            }),
            None => Ok(default),
        }
    }

    /// Like [`Env::parsed`] for counts and durations that must not be zero.
    fn positive(&self, var: &'static str, default: u64) -> Result<u64, ConfigError> {
        let value = self.parsed(var, default)?;
        if value == 0 {
            return Err(ConfigError::Invalid {
                var,
                reason: "must be greater than zero".into(),
            });
        }
        Ok(value)
    }
}
